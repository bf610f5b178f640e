#[cfg(test)]
mod tests {
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use atrium_core::domain::{User, UserRole};
    use atrium_core::ports::UserRepository;

    use crate::database::entity::user;
    use crate::database::postgres_repo::PostgresUserRepository;

    fn row(id: Uuid, email: &str, role: &str) -> user::Model {
        user::Model {
            id,
            name: "Ana".to_owned(),
            email: email.to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role: role.to_owned(),
            birth_date: chrono::NaiveDate::from_ymd_opt(1990, 4, 2),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn find_by_id_maps_row_to_domain_entity() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row(user_id, "ana@x.com", "admin")]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let found = repo.find_by_id(user_id).await.unwrap().unwrap();

        assert_eq!(found.id, user_id);
        assert_eq!(found.email, "ana@x.com");
        assert_eq!(found.role, UserRole::Admin);
        assert_eq!(
            found.birth_date,
            chrono::NaiveDate::from_ymd_opt(1990, 4, 2)
        );
        assert!(found.updated_at.is_none());
    }

    #[tokio::test]
    async fn unknown_stored_role_collapses_to_user() {
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row(user_id, "ana@x.com", "superuser")]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let found = repo.find_by_id(user_id).await.unwrap().unwrap();

        assert_eq!(found.role, UserRole::User);
    }

    #[tokio::test]
    async fn find_by_email_without_match_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<user::Model>::new()])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        assert!(repo.find_by_email("ghost@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        assert!(repo.delete(Uuid::new_v4()).await.unwrap());
        assert!(!repo.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn update_without_existing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<user::Model>::new()])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let err = repo
            .update(User::new("Ghost".into(), "ghost@x.com".into()))
            .await
            .unwrap_err();

        assert!(matches!(err, atrium_core::error::RepoError::NotFound));
    }
}
