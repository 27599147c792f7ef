use uuid::Uuid;

use crate::models::{GroupSettings, GroupType, GroupUpdate, Role};
use crate::permissions::{Permissions, permissions_for};
use crate::tests::test_user;
use crate::{InMemoryStorage, TimeflowService};

#[test]
fn test_non_member_gets_no_permissions() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let owner = test_user("Ana");
    let outsider = test_user("Bruno");
    let group = service
        .create_group(&owner, "Equipe", "", GroupType::Empresarial)
        .unwrap();

    let perms = service.user_permissions(&outsider, group.id);
    assert_eq!(perms, Permissions::none());
}

#[test]
fn test_missing_group_fails_closed() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let service = TimeflowService::new(&mut storage);

    let user = test_user("Ana");
    let perms = service.user_permissions(&user, Uuid::new_v4());
    assert_eq!(perms, Permissions::none());
}

#[test]
fn test_owner_has_full_permissions() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let owner = test_user("Ana");
    let group = service
        .create_group(&owner, "Equipe", "", GroupType::Empresarial)
        .unwrap();

    let perms = permissions_for(&group, owner.id);
    assert!(perms.can_create_tasks);
    assert!(perms.can_edit_tasks);
    assert!(perms.can_delete_tasks);
    assert!(perms.can_invite_members);
    assert!(perms.can_remove_members);
    assert!(perms.can_change_roles);
    assert!(perms.can_manage_settings);
    assert!(perms.can_delete_group);
}

#[test]
fn test_admin_permissions_stop_at_ownership() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let owner = test_user("Ana");
    let admin = test_user("Bruno");
    let group = service
        .create_group(&owner, "Equipe", "", GroupType::Empresarial)
        .unwrap();
    service.join_group(&admin, &group.invite_code).unwrap();
    service
        .update_member_role(&owner, group.id, admin.id, Role::Admin)
        .unwrap();

    let group = service.get_group(group.id).unwrap();
    let perms = permissions_for(&group, admin.id);
    assert!(perms.can_create_tasks);
    assert!(perms.can_edit_tasks);
    assert!(perms.can_delete_tasks);
    assert!(perms.can_invite_members);
    assert!(perms.can_remove_members);
    assert!(perms.can_manage_settings);
    // Role changes and group deletion stay with the owner.
    assert!(!perms.can_change_roles);
    assert!(!perms.can_delete_group);
}

#[test]
fn test_member_permissions_follow_settings() {
    let _ = env_logger::try_init();
    let mut storage = InMemoryStorage::new();
    let mut service = TimeflowService::new(&mut storage);

    let owner = test_user("Ana");
    let member = test_user("Bruno");
    let group = service
        .create_group(&owner, "Equipe", "", GroupType::Empresarial)
        .unwrap();
    service.join_group(&member, &group.invite_code).unwrap();

    let group_record = service.get_group(group.id).unwrap();
    let perms = permissions_for(&group_record, member.id);
    assert!(perms.can_create_tasks);
    assert!(perms.can_invite_members);
    assert!(!perms.can_edit_tasks);
    assert!(!perms.can_delete_tasks);
    assert!(!perms.can_remove_members);
    assert!(!perms.can_change_roles);
    assert!(!perms.can_manage_settings);
    assert!(!perms.can_delete_group);

    service
        .update_group(
            &owner,
            group.id,
            GroupUpdate {
                settings: Some(GroupSettings {
                    allow_members_to_invite: false,
                    allow_members_to_create_tasks: false,
                    ..GroupSettings::default()
                }),
                ..GroupUpdate::default()
            },
        )
        .unwrap();

    let group_record = service.get_group(group.id).unwrap();
    let perms = permissions_for(&group_record, member.id);
    assert!(!perms.can_create_tasks);
    assert!(!perms.can_invite_members);
}
