use chrono::{Datelike, Duration, Local, NaiveDateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::constants::{INVITE_CODE_ATTEMPTS, INVITE_CODE_LEN, PRIMARY_INVITE_TTL_DAYS};
use crate::error::TimeflowError;
use crate::models::*;
use crate::permissions::{Permissions, permissions_for};
use crate::storage::Storage;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardStats {
    pub today_activities: usize,
    pub overdue_activities: usize,
    pub completed_today: usize,
    pub total_today: usize,
    pub progress_percentage: u32,
    pub personal_tasks: usize,
    pub group_tasks: usize,
    pub weekly_progress: u32,
}

pub struct TimeflowService<'a> {
    pub storage: &'a mut dyn Storage,
}

impl<'a> TimeflowService<'a> {
    pub fn new(storage: &'a mut dyn Storage) -> Self {
        info!("Initializing TimeflowService");
        Self { storage }
    }

    // IDENTITY

    /// Returns the stored profile, provisioning a default one on first access.
    pub fn current_user(&mut self) -> Result<User, TimeflowError> {
        if let Some(user) = self.storage.current_user() {
            return Ok(user);
        }
        info!("No stored profile, provisioning a default user");
        self.storage
            .save_current_user(User::new("Meu Usuário", "usuario@timeflow.com"))
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, TimeflowError> {
        let mut user = self.current_user()?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        debug!("Profile updated for user {}", user.id);
        self.storage.save_current_user(user)
    }

    // GROUP MANAGEMENT

    pub fn create_group(
        &mut self,
        actor: &User,
        name: &str,
        description: &str,
        group_type: GroupType,
    ) -> Result<Group, TimeflowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TimeflowError::MissingName);
        }
        info!("Creating group '{}' for owner {}", name, actor.id);

        let now = Utc::now();
        let code = self.unique_invite_code()?;
        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            group_type,
            owner_id: actor.id,
            invite_code: code.clone(),
            members: vec![GroupMember {
                user_id: actor.id,
                user_name: actor.name.clone(),
                user_email: Some(actor.email.clone()),
                role: Role::Owner,
                joined_at: now,
                invited_by: None,
            }],
            settings: GroupSettings::default(),
            created_at: now,
            updated_at: now,
        };
        let created = self.storage.insert_group(group)?;

        // The primary invite mirrors the group code and never expires in practice.
        self.storage.insert_invite(Invite {
            id: Uuid::new_v4(),
            code,
            group_id: created.id,
            group_name: created.name.clone(),
            created_by: actor.id,
            created_by_name: actor.name.clone(),
            expires_at: now + Duration::days(PRIMARY_INVITE_TTL_DAYS),
            max_uses: None,
            current_uses: 0,
            is_active: true,
            created_at: now,
        })?;

        debug!("Group created with ID: {}", created.id);
        Ok(created)
    }

    pub fn join_group(&mut self, actor: &User, code: &str) -> Result<Group, TimeflowError> {
        let code = code.trim().to_uppercase();
        info!("User {} attempting to join with code {}", actor.id, code);

        let invite = self.storage.find_invite_by_code(&code);
        let group = match self.storage.find_group_by_invite_code(&code) {
            Some(group) => group,
            None => {
                // Secondary invites carry their own expiry and use cap.
                let invite = invite.as_ref().ok_or(TimeflowError::InviteNotFound)?;
                if !invite.is_usable(Utc::now()) {
                    warn!("Invite {} is no longer usable", invite.code);
                    return Err(TimeflowError::InviteExpired);
                }
                self.storage
                    .get_group(invite.group_id)
                    .ok_or(TimeflowError::InviteNotFound)?
            }
        };

        if group.is_member(actor.id) {
            debug!("User {} already in group {}", actor.id, group.id);
            return Ok(group);
        }
        if group.is_full() {
            warn!("Group {} refused join: member limit reached", group.id);
            return Err(TimeflowError::GroupFull(group.settings.max_members));
        }

        let now = Utc::now();
        let mut group = group;
        group.members.push(GroupMember {
            user_id: actor.id,
            user_name: actor.name.clone(),
            user_email: Some(actor.email.clone()),
            role: Role::Member,
            joined_at: now,
            invited_by: invite.as_ref().map(|i| i.created_by),
        });
        group.updated_at = now;
        let group = self.storage.update_group(group)?;

        if let Some(mut invite) = invite {
            invite.current_uses += 1;
            self.storage.update_invite(invite)?;
        }

        self.notify(
            NotificationKind::MemberJoined,
            "Novo membro",
            format!("{} entrou no grupo {}", actor.name, group.name),
            Some(group.id),
            None,
            actor.id,
        )?;
        self.log_group(
            group.id,
            actor,
            GroupAction::MemberJoined,
            format!("{} entrou no grupo", actor.name),
            None,
        )?;

        debug!("User {} joined group {}", actor.id, group.id);
        Ok(group)
    }

    pub fn leave_group(&mut self, actor: &User, group_id: Uuid) -> Result<(), TimeflowError> {
        info!("User {} leaving group {}", actor.id, group_id);
        let mut group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        if !group.is_member(actor.id) {
            return Err(TimeflowError::NotGroupMember(actor.id));
        }
        if group.owner_id == actor.id {
            warn!("Owner {} attempted to leave group {}", actor.id, group_id);
            return Err(TimeflowError::OwnerCannotLeave);
        }

        group.members.retain(|m| m.user_id != actor.id);
        group.updated_at = Utc::now();
        self.storage.update_group(group)?;

        self.log_group(
            group_id,
            actor,
            GroupAction::MemberLeft,
            format!("{} saiu do grupo", actor.name),
            None,
        )?;
        Ok(())
    }

    pub fn remove_member(
        &mut self,
        actor: &User,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), TimeflowError> {
        info!(
            "User {} removing user {} from group {}",
            actor.id, user_id, group_id
        );
        let mut group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        if !permissions_for(&group, actor.id).can_remove_members {
            warn!(
                "User {} may not remove members from group {}",
                actor.id, group_id
            );
            return Err(TimeflowError::NotAuthorized(actor.id));
        }
        let target = group
            .member(user_id)
            .cloned()
            .ok_or(TimeflowError::NotGroupMember(user_id))?;
        if target.is_owner() {
            warn!("Refused to remove owner {} from group {}", user_id, group_id);
            return Err(TimeflowError::CannotRemoveOwner);
        }

        group.members.retain(|m| m.user_id != user_id);
        group.updated_at = Utc::now();
        let group = self.storage.update_group(group)?;

        self.notify(
            NotificationKind::MemberRemoved,
            "Membro removido",
            format!(
                "{} removeu {} do grupo {}",
                actor.name, target.user_name, group.name
            ),
            Some(group.id),
            None,
            actor.id,
        )?;
        self.log_group(
            group.id,
            actor,
            GroupAction::MemberRemoved,
            format!("{} removeu {}", actor.name, target.user_name),
            Some(json!({ "removed_user_id": user_id })),
        )?;
        Ok(())
    }

    pub fn update_member_role(
        &mut self,
        actor: &User,
        group_id: Uuid,
        user_id: Uuid,
        role: Role,
    ) -> Result<(), TimeflowError> {
        info!(
            "User {} changing role of {} in group {} to {}",
            actor.id, user_id, group_id, role
        );
        let mut group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        if !permissions_for(&group, actor.id).can_change_roles {
            warn!("User {} may not change roles in group {}", actor.id, group_id);
            return Err(TimeflowError::NotAuthorized(actor.id));
        }
        if role == Role::Owner {
            // A group has exactly one owner; ownership is not transferable here.
            return Err(TimeflowError::OwnerRoleNotGrantable);
        }

        let member = group
            .member_mut(user_id)
            .ok_or(TimeflowError::NotGroupMember(user_id))?;
        if member.is_owner() {
            warn!("Refused role change for owner of group {}", group_id);
            return Err(TimeflowError::OwnerRoleImmutable);
        }
        let old_role = member.role;
        member.role = role;
        let member_name = member.user_name.clone();
        group.updated_at = Utc::now();
        let group = self.storage.update_group(group)?;

        self.notify(
            NotificationKind::RoleChanged,
            "Função alterada",
            format!("{} agora é {} no grupo {}", member_name, role, group.name),
            Some(group.id),
            None,
            actor.id,
        )?;
        self.log_group(
            group.id,
            actor,
            GroupAction::RoleChanged,
            format!(
                "{} alterou a função de {} para {}",
                actor.name, member_name, role
            ),
            Some(json!({ "old_role": old_role, "new_role": role })),
        )?;
        Ok(())
    }

    pub fn update_group(
        &mut self,
        actor: &User,
        group_id: Uuid,
        update: GroupUpdate,
    ) -> Result<Group, TimeflowError> {
        info!("User {} updating group {}", actor.id, group_id);
        let mut group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        if !permissions_for(&group, actor.id).can_manage_settings {
            warn!("User {} may not manage group {}", actor.id, group_id);
            return Err(TimeflowError::NotAuthorized(actor.id));
        }

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(TimeflowError::MissingName);
            }
            group.name = name;
        }
        if let Some(description) = update.description {
            group.description = description;
        }
        if let Some(group_type) = update.group_type {
            group.group_type = group_type;
        }
        let mut settings_changed = false;
        if let Some(settings) = update.settings {
            settings_changed = settings != group.settings;
            group.settings = settings;
        }
        group.updated_at = Utc::now();
        let group = self.storage.update_group(group)?;

        if settings_changed {
            self.log_group(
                group.id,
                actor,
                GroupAction::SettingsChanged,
                format!("{} atualizou as configurações do grupo", actor.name),
                None,
            )?;
        }
        Ok(group)
    }

    pub fn delete_group(&mut self, actor: &User, group_id: Uuid) -> Result<(), TimeflowError> {
        info!("User {} deleting group {}", actor.id, group_id);
        let group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        if !permissions_for(&group, actor.id).can_delete_group {
            warn!("User {} may not delete group {}", actor.id, group_id);
            return Err(TimeflowError::NotAuthorized(actor.id));
        }

        let removed_activities = self.storage.remove_group_activities(group_id)?;
        let removed_invites = self.storage.remove_group_invites(group_id)?;
        self.storage.remove_group(group_id)?;
        // Activity log entries are kept as the historical record of the group.

        info!(
            "Deleted group {} along with {} activities and {} invites",
            group_id, removed_activities, removed_invites
        );
        Ok(())
    }

    pub fn create_invite(
        &mut self,
        actor: &User,
        group_id: Uuid,
        ttl_days: i64,
        max_uses: Option<u32>,
    ) -> Result<Invite, TimeflowError> {
        info!("User {} creating invite for group {}", actor.id, group_id);
        let group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        if !permissions_for(&group, actor.id).can_invite_members {
            warn!(
                "User {} may not invite members to group {}",
                actor.id, group_id
            );
            return Err(TimeflowError::NotAuthorized(actor.id));
        }

        let now = Utc::now();
        let invite = self.storage.insert_invite(Invite {
            id: Uuid::new_v4(),
            code: self.unique_invite_code()?,
            group_id,
            group_name: group.name.clone(),
            created_by: actor.id,
            created_by_name: actor.name.clone(),
            expires_at: now + Duration::days(ttl_days),
            max_uses,
            current_uses: 0,
            is_active: true,
            created_at: now,
        })?;

        self.notify(
            NotificationKind::InviteCreated,
            "Convite criado",
            format!("{} criou um convite para o grupo {}", actor.name, group.name),
            Some(group_id),
            None,
            actor.id,
        )?;
        Ok(invite)
    }

    pub fn user_groups(&self, actor: &User) -> Vec<Group> {
        self.storage
            .list_groups()
            .into_iter()
            .filter(|g| g.is_member(actor.id))
            .collect()
    }

    pub fn get_group(&self, group_id: Uuid) -> Option<Group> {
        self.storage.get_group(group_id)
    }

    pub fn group_invites(
        &self,
        actor: &User,
        group_id: Uuid,
    ) -> Result<Vec<Invite>, TimeflowError> {
        let group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        if !group.is_member(actor.id) {
            return Err(TimeflowError::NotGroupMember(actor.id));
        }
        Ok(self
            .storage
            .list_invites()
            .into_iter()
            .filter(|i| i.group_id == group_id)
            .collect())
    }

    // PERMISSIONS

    /// Fail-closed: a missing group yields the empty capability set.
    pub fn user_permissions(&self, actor: &User, group_id: Uuid) -> Permissions {
        match self.storage.get_group(group_id) {
            Some(group) => permissions_for(&group, actor.id),
            None => Permissions::none(),
        }
    }

    pub fn can_edit_activity(&self, actor: &User, activity_id: Uuid) -> bool {
        match self.storage.get_activity(activity_id) {
            Some(activity) => self.can_edit_activity_record(actor, &activity),
            None => false,
        }
    }

    fn can_edit_activity_record(&self, actor: &User, activity: &Activity) -> bool {
        // The creator can always edit; group role authority covers the rest.
        if activity.created_by == actor.id {
            return true;
        }
        match activity.group_id {
            Some(group_id) => self.user_permissions(actor, group_id).can_edit_tasks,
            None => false,
        }
    }

    fn can_delete_activity_record(&self, actor: &User, activity: &Activity) -> bool {
        if activity.created_by == actor.id {
            return true;
        }
        match activity.group_id {
            Some(group_id) => self.user_permissions(actor, group_id).can_delete_tasks,
            None => false,
        }
    }

    fn can_view_activity(&self, actor: &User, activity: &Activity) -> bool {
        if activity.created_by == actor.id {
            return true;
        }
        match activity.group_id {
            Some(group_id) => self
                .storage
                .get_group(group_id)
                .is_some_and(|g| g.is_member(actor.id)),
            None => false,
        }
    }

    // ACTIVITY MANAGEMENT

    pub fn add_activity(
        &mut self,
        actor: &User,
        draft: ActivityDraft,
    ) -> Result<Activity, TimeflowError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(TimeflowError::MissingTitle);
        }
        info!("Creating activity '{}' for user {}", title, actor.id);

        if let Some(group_id) = draft.group_id {
            let group = self
                .storage
                .get_group(group_id)
                .ok_or(TimeflowError::GroupNotFound(group_id))?;
            if !permissions_for(&group, actor.id).can_create_tasks {
                warn!(
                    "User {} may not create tasks in group {}",
                    actor.id, group_id
                );
                return Err(TimeflowError::NotAuthorized(actor.id));
            }
            for assignee in &draft.assignees {
                if !group.is_member(*assignee) {
                    warn!("Assignee {} not in group {}", assignee, group_id);
                    return Err(TimeflowError::AssigneeNotMember(*assignee));
                }
            }
        }

        let now = Utc::now();
        let created = self.storage.insert_activity(Activity {
            id: Uuid::new_v4(),
            title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            priority: draft.priority,
            category: draft.category,
            duration_minutes: draft.duration_minutes,
            status: Status::Pendente,
            created_at: now,
            completed_at: None,
            group_id: draft.group_id,
            created_by: actor.id,
            assignees: draft.assignees,
            is_shared: draft.group_id.is_some(),
            tags: draft.tags,
            attachments: Vec::new(),
            comments: Vec::new(),
        })?;

        if let Some(group_id) = created.group_id {
            self.notify(
                NotificationKind::TaskCreated,
                "Nova tarefa criada",
                format!("{} criou: {}", actor.name, created.title),
                Some(group_id),
                Some(created.id),
                actor.id,
            )?;
            self.log_group(
                group_id,
                actor,
                GroupAction::TaskCreated,
                format!("{} criou a tarefa: {}", actor.name, created.title),
                None,
            )?;
        }

        debug!("Activity created with ID: {}", created.id);
        Ok(created)
    }

    pub fn update_activity(
        &mut self,
        actor: &User,
        id: Uuid,
        update: ActivityUpdate,
    ) -> Result<Activity, TimeflowError> {
        info!("User {} updating activity {}", actor.id, id);
        let mut activity = self
            .storage
            .get_activity(id)
            .ok_or(TimeflowError::ActivityNotFound(id))?;
        if !self.can_edit_activity_record(actor, &activity) {
            warn!("User {} may not edit activity {}", actor.id, id);
            return Err(TimeflowError::NotAuthorized(actor.id));
        }

        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(TimeflowError::MissingTitle);
            }
            activity.title = title;
        }
        if let Some(description) = update.description {
            activity.description = description;
        }
        if let Some(date) = update.date {
            activity.date = date;
        }
        if let Some(time) = update.time {
            activity.time = time;
        }
        if let Some(priority) = update.priority {
            activity.priority = priority;
        }
        if let Some(category) = update.category {
            activity.category = category;
        }
        if let Some(duration_minutes) = update.duration_minutes {
            activity.duration_minutes = duration_minutes;
        }
        if let Some(assignees) = update.assignees {
            if let Some(group_id) = activity.group_id {
                let group = self
                    .storage
                    .get_group(group_id)
                    .ok_or(TimeflowError::GroupNotFound(group_id))?;
                for assignee in &assignees {
                    if !group.is_member(*assignee) {
                        return Err(TimeflowError::AssigneeNotMember(*assignee));
                    }
                }
            }
            activity.assignees = assignees;
        }
        if let Some(tags) = update.tags {
            activity.tags = tags;
        }

        self.storage.update_activity(activity)
    }

    pub fn toggle_complete(&mut self, actor: &User, id: Uuid) -> Result<Activity, TimeflowError> {
        let mut activity = self
            .storage
            .get_activity(id)
            .ok_or(TimeflowError::ActivityNotFound(id))?;
        if !self.can_view_activity(actor, &activity) {
            warn!("User {} may not toggle activity {}", actor.id, id);
            return Err(TimeflowError::NotAuthorized(actor.id));
        }

        match activity.status {
            Status::Pendente => {
                activity.status = Status::Concluida;
                activity.completed_at = Some(Utc::now());
            }
            Status::Concluida => {
                activity.status = Status::Pendente;
                activity.completed_at = None;
            }
        }
        let updated = self.storage.update_activity(activity)?;
        debug!("Activity {} now {:?}", updated.id, updated.status);

        if updated.is_completed() {
            if let Some(group_id) = updated.group_id {
                self.notify(
                    NotificationKind::TaskCompleted,
                    "Tarefa concluída",
                    format!("{} concluiu: {}", actor.name, updated.title),
                    Some(group_id),
                    Some(updated.id),
                    actor.id,
                )?;
                self.log_group(
                    group_id,
                    actor,
                    GroupAction::TaskCompleted,
                    format!("{} concluiu a tarefa: {}", actor.name, updated.title),
                    None,
                )?;
            }
        }
        Ok(updated)
    }

    pub fn delete_activity(&mut self, actor: &User, id: Uuid) -> Result<(), TimeflowError> {
        info!("User {} deleting activity {}", actor.id, id);
        let activity = self
            .storage
            .get_activity(id)
            .ok_or(TimeflowError::ActivityNotFound(id))?;
        if !self.can_delete_activity_record(actor, &activity) {
            warn!("User {} may not delete activity {}", actor.id, id);
            return Err(TimeflowError::NotAuthorized(actor.id));
        }

        self.storage.remove_activity(id)?;
        if let Some(group_id) = activity.group_id {
            // Recorded in the group history only; deletions do not notify.
            self.log_group(
                group_id,
                actor,
                GroupAction::TaskDeleted,
                format!("{} removeu a tarefa: {}", actor.name, activity.title),
                None,
            )?;
        }
        Ok(())
    }

    pub fn add_comment(
        &mut self,
        actor: &User,
        activity_id: Uuid,
        content: &str,
    ) -> Result<Activity, TimeflowError> {
        let mut activity = self
            .storage
            .get_activity(activity_id)
            .ok_or(TimeflowError::ActivityNotFound(activity_id))?;
        if !self.can_view_activity(actor, &activity) {
            return Err(TimeflowError::NotAuthorized(actor.id));
        }

        activity.comments.push(ActivityComment {
            id: Uuid::new_v4(),
            activity_id,
            user_id: actor.id,
            user_name: actor.name.clone(),
            content: content.to_string(),
            created_at: Utc::now(),
        });
        self.storage.update_activity(activity)
    }

    pub fn assign_activity(
        &mut self,
        actor: &User,
        activity_id: Uuid,
        assignees: Vec<Uuid>,
    ) -> Result<Activity, TimeflowError> {
        info!("User {} assigning activity {}", actor.id, activity_id);
        let mut activity = self
            .storage
            .get_activity(activity_id)
            .ok_or(TimeflowError::ActivityNotFound(activity_id))?;
        let group_id = activity
            .group_id
            .ok_or(TimeflowError::NotGroupActivity(activity_id))?;
        if !self.can_edit_activity_record(actor, &activity) {
            warn!("User {} may not assign activity {}", actor.id, activity_id);
            return Err(TimeflowError::NotAuthorized(actor.id));
        }
        let group = self
            .storage
            .get_group(group_id)
            .ok_or(TimeflowError::GroupNotFound(group_id))?;
        for assignee in &assignees {
            if !group.is_member(*assignee) {
                return Err(TimeflowError::AssigneeNotMember(*assignee));
            }
        }

        activity.assignees = assignees;
        let updated = self.storage.update_activity(activity)?;

        self.notify(
            NotificationKind::TaskAssigned,
            "Tarefa atribuída",
            format!("{} atribuiu a tarefa: {}", actor.name, updated.title),
            Some(group_id),
            Some(updated.id),
            actor.id,
        )?;
        Ok(updated)
    }

    pub fn get_activity(&self, id: Uuid) -> Option<Activity> {
        self.storage.get_activity(id)
    }

    /// Conjunctive filtering over the activities visible to the actor:
    /// their own personal tasks plus the tasks of groups they belong to.
    pub fn filter_activities(&self, actor: &User, filter: &ActivityFilter) -> Vec<Activity> {
        let member_of: Vec<Uuid> = self
            .storage
            .list_groups()
            .into_iter()
            .filter(|g| g.is_member(actor.id))
            .map(|g| g.id)
            .collect();

        self.storage
            .list_activities()
            .into_iter()
            .filter(|a| match a.group_id {
                Some(group_id) => member_of.contains(&group_id),
                None => a.created_by == actor.id,
            })
            .filter(|a| match filter.scope {
                Scope::Personal => a.group_id.is_none(),
                Scope::Groups => a.group_id.is_some(),
                Scope::All => true,
            })
            .filter(|a| filter.status.is_none_or(|s| a.status == s))
            .filter(|a| filter.priority.is_none_or(|p| a.priority == p))
            .filter(|a| filter.category.is_none_or(|c| a.category == c))
            .filter(|a| filter.date.is_none_or(|d| a.date == d))
            .filter(|a| filter.group_id.is_none_or(|g| a.group_id == Some(g)))
            .filter(|a| filter.assignee.is_none_or(|u| a.assignees.contains(&u)))
            .filter(|a| filter.tags.iter().all(|t| a.tags.contains(t)))
            .collect()
    }

    // NOTIFICATIONS & GROUP HISTORY

    pub fn notifications(&self) -> Vec<Notification> {
        self.storage.list_notifications()
    }

    pub fn unread_count(&self) -> usize {
        self.storage
            .list_notifications()
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    pub fn mark_notification_read(&mut self, id: Uuid) -> Result<(), TimeflowError> {
        if self.storage.mark_notification_read(id)? {
            Ok(())
        } else {
            Err(TimeflowError::NotificationNotFound(id))
        }
    }

    pub fn group_activity_logs(&self, group_id: Uuid) -> Vec<GroupActivityLog> {
        self.storage.list_group_logs(group_id)
    }

    // DASHBOARD

    pub fn dashboard_stats(&self, actor: &User) -> DashboardStats {
        self.dashboard_stats_at(actor, Local::now().naive_local())
    }

    pub fn dashboard_stats_at(&self, actor: &User, now: NaiveDateTime) -> DashboardStats {
        let visible = self.filter_activities(actor, &ActivityFilter::default());
        let today = now.date();
        // Weeks run Sunday through Saturday.
        let week_start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);

        let total_today = visible.iter().filter(|a| a.date == today).count();
        let completed_today = visible
            .iter()
            .filter(|a| a.date == today && a.is_completed())
            .count();

        let overdue_activities = visible
            .iter()
            .filter(|a| !a.is_completed() && a.date.and_time(a.time) < now)
            .count();

        let week_total = visible.iter().filter(|a| a.date >= week_start).count();
        let week_completed = visible
            .iter()
            .filter(|a| a.date >= week_start && a.is_completed())
            .count();

        DashboardStats {
            today_activities: total_today,
            overdue_activities,
            completed_today,
            total_today,
            progress_percentage: percentage(completed_today, total_today),
            personal_tasks: visible
                .iter()
                .filter(|a| a.group_id.is_none() && !a.is_completed())
                .count(),
            group_tasks: visible
                .iter()
                .filter(|a| a.group_id.is_some() && !a.is_completed())
                .count(),
            weekly_progress: percentage(week_completed, week_total),
        }
    }

    // HELPERS

    fn notify(
        &mut self,
        kind: NotificationKind,
        title: &str,
        message: String,
        group_id: Option<Uuid>,
        activity_id: Option<Uuid>,
        user_id: Uuid,
    ) -> Result<(), TimeflowError> {
        self.storage.push_notification(Notification {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            message,
            group_id,
            activity_id,
            user_id,
            read: false,
            created_at: Utc::now(),
            metadata: None,
        })?;
        Ok(())
    }

    fn log_group(
        &mut self,
        group_id: Uuid,
        actor: &User,
        action: GroupAction,
        description: String,
        metadata: Option<serde_json::Value>,
    ) -> Result<(), TimeflowError> {
        let mut entry =
            GroupActivityLog::new(group_id, actor.id, actor.name.clone(), action, description);
        entry.metadata = metadata;
        self.storage.push_group_log(entry)
    }

    fn unique_invite_code(&self) -> Result<String, TimeflowError> {
        for _ in 0..INVITE_CODE_ATTEMPTS {
            let code = invite_code();
            let taken = self.storage.find_group_by_invite_code(&code).is_some()
                || self.storage.find_invite_by_code(&code).is_some();
            if !taken {
                return Ok(code);
            }
            debug!("Invite code collision, retrying");
        }
        warn!("Gave up generating an unused invite code");
        Err(TimeflowError::InviteCodeExhausted)
    }
}

/// 8-character uppercase base-36 code derived from a random UUID.
fn invite_code() -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut value = Uuid::new_v4().as_u128();
    let mut code = String::with_capacity(INVITE_CODE_LEN);
    for _ in 0..INVITE_CODE_LEN {
        code.push(ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    code
}

fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}
