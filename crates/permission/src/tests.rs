use std::str::FromStr;
use std::thread;

use pretty_assertions::assert_eq;
use rstest::rstest;
use strum::IntoEnumIterator;

use super::PermissionLevel::{Admin, Developer, Maintainer, User};
use super::*;

#[test]
fn empty_registry_grants_nothing() {
	let registry = PermissionRegistry::new();
	for level in PermissionLevel::iter() {
		assert!(!registry.has_permission(level), "{level} should not be held");
	}
}

#[test]
fn granted_levels_are_held() {
	for level in PermissionLevel::iter() {
		let registry = PermissionRegistry::new();
		registry.grant(level);
		assert!(registry.has_permission(level));
	}
}

#[test]
fn admin_implies_every_level() {
	let registry = PermissionRegistry::from_levels([Admin]);
	for level in PermissionLevel::iter() {
		assert!(registry.has_permission(level), "admin should imply {level}");
	}
}

#[rstest]
#[case::developer(Developer, &[User, Developer, Maintainer])]
#[case::maintainer(Maintainer, &[User, Maintainer])]
#[case::user(User, &[User])]
fn hierarchy(#[case] granted: PermissionLevel, #[case] held: &[PermissionLevel]) {
	let registry = PermissionRegistry::from_levels([granted]);
	let actual: Vec<_> = PermissionLevel::iter().filter(|level| registry.has_permission(*level)).collect();
	assert_eq!(actual, held);
}

#[test]
fn developer_does_not_imply_admin() {
	let registry = PermissionRegistry::from_levels([Developer]);
	assert!(!registry.has_permission(Admin));
	assert!(!registry.has_permission(PermissionLevel::None));
}

#[test]
fn grant_and_revoke_are_idempotent() {
	let registry = PermissionRegistry::new();
	assert!(registry.grant(User));
	assert!(!registry.grant(User));
	assert_eq!(registry.granted(), vec![User]);

	assert!(registry.revoke(User));
	assert!(!registry.revoke(User));
	assert!(!registry.revoke(Admin));
	assert!(registry.granted().is_empty());
}

#[test]
fn revoking_the_implying_level_drops_implied_levels() {
	let registry = PermissionRegistry::from_levels([Developer, User]);
	registry.revoke(Developer);
	assert!(registry.has_permission(User));
	assert!(!registry.has_permission(Maintainer));
}

#[test]
fn permits_treats_none_as_unrestricted() {
	let registry = PermissionRegistry::new();
	assert!(registry.permits(PermissionLevel::None));
	assert!(!registry.permits(User));
}

#[test]
fn require_reports_missing_level() {
	let registry = PermissionRegistry::from_levels([Maintainer]);
	assert_eq!(registry.require(User), Ok(()));
	let err = registry.require(Admin).unwrap_err();
	assert_eq!(err, PermissionDenied { required: Admin });
	assert_eq!(err.to_string(), "permission 'Admin' is required");
}

#[test]
fn clones_share_grants() {
	let registry = PermissionRegistry::new();
	let view = registry.clone();
	registry.grant(Maintainer);
	assert!(view.has_permission(User));
	view.clear();
	assert!(!registry.has_permission(Maintainer));
}

#[test]
fn concurrent_grants_are_not_lost() {
	let registry = PermissionRegistry::new();
	thread::scope(|scope| {
		for level in PermissionLevel::iter() {
			let registry = registry.clone();
			scope.spawn(move || {
				for _ in 0..100 {
					registry.grant(level);
					let _ = registry.has_permission(Admin);
				}
			});
		}
	});
	assert_eq!(registry.granted(), PermissionLevel::iter().collect::<Vec<_>>());
}

#[test]
fn levels_parse_case_insensitively() {
	assert_eq!(PermissionLevel::from_str("admin"), Ok(Admin));
	assert_eq!(PermissionLevel::from_str("Maintainer"), Ok(Maintainer));
	assert!(PermissionLevel::from_str("root").is_err());
}

#[test]
fn levels_deserialize_lowercase() {
	#[derive(serde::Deserialize)]
	struct Grants {
		granted: Vec<PermissionLevel>,
	}
	let grants: Grants = toml::from_str(r#"granted = ["user", "developer"]"#).unwrap();
	assert_eq!(grants.granted, vec![User, Developer]);
}
