//! Members service

use uuid::Uuid;
use validator::Validate;

use super::changes::{ChangeHub, Collection};
use crate::{
    error::AppResult,
    models::member::{CreateMember, Member, MemberQuery, UpdateMember},
    names::trim_opt,
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
    changes: ChangeHub,
}

impl MembersService {
    pub fn new(repository: Repository, changes: ChangeHub) -> Self {
        Self { repository, changes }
    }

    /// List members, newest first, optionally filtered by free text
    pub async fn list(&self, query: &MemberQuery) -> AppResult<Vec<Member>> {
        let members = self.repository.members.list().await?;
        Ok(match query.q.as_deref() {
            Some(q) => members.into_iter().filter(|m| m.matches(q)).collect(),
            None => members,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Member> {
        self.repository.members.get_by_id(id).await
    }

    pub async fn create(&self, data: CreateMember) -> AppResult<Member> {
        self.create_with_id(Uuid::new_v4(), data).await
    }

    /// Create a member with a caller-chosen id (seed import)
    pub async fn create_with_id(&self, id: Uuid, data: CreateMember) -> AppResult<Member> {
        let data = trim_create(data);
        data.validate()?;

        let member = self.repository.members.create(id, &data).await?;
        tracing::info!(member_id = %member.id, "Member created");
        self.changes.publish(Collection::Members);
        Ok(member)
    }

    pub async fn update(&self, id: Uuid, data: UpdateMember) -> AppResult<Member> {
        let data = trim_update(data);
        data.validate()?;

        let member = self.repository.members.update(id, &data).await?;
        tracing::info!(member_id = %id, "Member updated");
        self.changes.publish(Collection::Members);
        Ok(member)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.members.delete(id).await?;
        tracing::info!(member_id = %id, "Member deleted");
        self.changes.publish(Collection::Members);
        Ok(())
    }
}

fn trim_create(data: CreateMember) -> CreateMember {
    CreateMember {
        first_name: data.first_name.trim().to_string(),
        last_name: data.last_name.trim().to_string(),
        phone: trim_opt(data.phone.as_deref()),
        email: trim_opt(data.email.as_deref()),
        personal_id: trim_opt(data.personal_id.as_deref()),
        ..data
    }
}

// Blank names stay `Some("")` so validation rejects them. A blank contact
// field becomes `Some(None)` and is cleared.
fn trim_update(data: UpdateMember) -> UpdateMember {
    let clear_blank = |v: Option<Option<String>>| v.map(|s| trim_opt(s.as_deref()));
    UpdateMember {
        first_name: data.first_name.map(|s| s.trim().to_string()),
        last_name: data.last_name.map(|s| s.trim().to_string()),
        phone: clear_blank(data.phone),
        email: clear_blank(data.email),
        personal_id: clear_blank(data.personal_id),
        ..data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::MemberRole;

    fn create(first: &str, last: &str) -> CreateMember {
        CreateMember {
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: MemberRole::Member,
            phone: Some("  ".to_string()),
            email: Some(" ivan@dvd.hr ".to_string()),
            birth_date: None,
            personal_id: None,
            medical_exam_date: None,
        }
    }

    #[test]
    fn test_trim_create() {
        let data = trim_create(create("  Ivan ", " Horvat"));
        assert_eq!(data.first_name, "Ivan");
        assert_eq!(data.last_name, "Horvat");
        assert_eq!(data.phone, None);
        assert_eq!(data.email.as_deref(), Some("ivan@dvd.hr"));
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_trim_update_blank_clears() {
        let data = trim_update(UpdateMember {
            phone: Some(Some("   ".to_string())),
            email: Some(Some("".to_string())),
            personal_id: Some(Some(" 1234 ".to_string())),
            ..Default::default()
        });
        assert_eq!(data.phone, Some(None));
        assert_eq!(data.email, Some(None));
        assert_eq!(data.personal_id, Some(Some("1234".to_string())));
        assert_eq!(data.birth_date, None);
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_trim_update_absent_untouched() {
        let data = trim_update(UpdateMember {
            first_name: Some(" Marko ".to_string()),
            ..Default::default()
        });
        assert_eq!(data.first_name.as_deref(), Some("Marko"));
        assert_eq!(data.phone, None);
        assert_eq!(data.email, None);
    }

    #[test]
    fn test_blank_name_rejected_after_trim() {
        let data = trim_create(create("   ", "Horvat"));
        assert!(data.validate().is_err());
    }
}
