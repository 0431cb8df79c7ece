//! Car queries against MySQL
//!
//! Statements use named placeholders; see [`super::named`].

use async_trait::async_trait;

use super::{CarConnection, DbError, MySqlSession, SqlValue};
use crate::config::SessionSettings;
use crate::models::{Car, NewCar};

const LIST_ACTIVE: &str = "SELECT * FROM car WHERE deleted_flag = 0";

const INSERT: &str = r#"
    INSERT INTO car (make, model, year, deleted_flag)
    VALUES (:make, :model, :year, :deleted_flag)
"#;

const UPDATE_MAKE: &str = "UPDATE car SET make = :make WHERE id = :id";

const FIND_BY_ID: &str = "SELECT * FROM car WHERE id = :id";

const SOFT_DELETE: &str = "UPDATE car SET deleted_flag = 1 WHERE id = :id";

#[async_trait]
impl CarConnection for MySqlSession {
    async fn configure(&mut self, settings: &SessionSettings) -> Result<(), DbError> {
        self.apply_settings(settings).await
    }

    async fn list_active(&mut self) -> Result<Vec<Car>, DbError> {
        self.fetch_cars(LIST_ACTIVE, &[]).await
    }

    async fn insert(&mut self, car: &NewCar) -> Result<u64, DbError> {
        let result = self
            .execute_named(
                INSERT,
                &[
                    ("make", SqlValue::from(car.make.as_deref())),
                    ("model", SqlValue::from(car.model.as_deref())),
                    ("year", SqlValue::from(car.year)),
                    ("deleted_flag", SqlValue::from(car.deleted_flag)),
                ],
            )
            .await?;
        tracing::debug!(id = result.last_insert_id(), "car inserted");
        Ok(result.rows_affected())
    }

    async fn update_make(
        &mut self,
        id: Option<i64>,
        make: Option<&str>,
    ) -> Result<u64, DbError> {
        let result = self
            .execute_named(
                UPDATE_MAKE,
                &[("id", SqlValue::from(id)), ("make", SqlValue::from(make))],
            )
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_by_id(&mut self, id: Option<i64>) -> Result<Vec<Car>, DbError> {
        self.fetch_cars(FIND_BY_ID, &[("id", SqlValue::from(id))]).await
    }

    async fn soft_delete(&mut self, id: i64) -> Result<u64, DbError> {
        let result = self
            .execute_named(SOFT_DELETE, &[("id", SqlValue::from(id))])
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use crate::db::{create_pool, schema, ConnectionSource, NamedQuery};

    #[test]
    fn statements_compile_to_expected_binds() {
        assert!(NamedQuery::compile(LIST_ACTIVE).names().is_empty());
        assert_eq!(
            NamedQuery::compile(INSERT).names(),
            ["make", "model", "year", "deleted_flag"]
        );
        assert_eq!(NamedQuery::compile(UPDATE_MAKE).names(), ["make", "id"]);
        assert_eq!(NamedQuery::compile(FIND_BY_ID).names(), ["id"]);
        assert_eq!(NamedQuery::compile(SOFT_DELETE).names(), ["id"]);
    }

    // Integration tests require a real database
    // Run with: DB_NAME=... cargo test -p carlot-server -- --ignored

    fn config_from_env() -> DbConfig {
        let database = std::env::var("DB_NAME").expect("DB_NAME required");
        DbConfig {
            host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
            user: std::env::var("DB_USER").unwrap_or_else(|_| "root".into()),
            password: std::env::var("DB_PASSWORD").ok(),
            ..DbConfig::new(database)
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn car_round_trip() {
        let pool = create_pool(&config_from_env()).await.expect("pool creation failed");
        schema::ensure_car_table(&pool).await.expect("schema failed");

        let mut session = ConnectionSource::acquire(&pool).await.expect("acquire failed");
        session
            .configure(&SessionSettings::default())
            .await
            .expect("configure failed");

        // Unique model so rows from earlier runs don't interfere
        let model = format!("RoundTrip-{}", std::process::id());
        let inserted = session
            .insert(&NewCar {
                make: Some("Honda".into()),
                model: Some(model.clone()),
                year: Some(2020),
                deleted_flag: Some(0),
            })
            .await
            .expect("insert failed");
        assert_eq!(inserted, 1);

        let car = session
            .list_active()
            .await
            .expect("list failed")
            .into_iter()
            .find(|car| car.model == model)
            .expect("inserted car not listed");
        assert_eq!(car.make, "Honda");
        assert_eq!(car.year, 2020);
        assert_eq!(car.deleted_flag, 0);

        let updated = session
            .update_make(Some(car.id), Some("Toyota"))
            .await
            .expect("update failed");
        assert_eq!(updated, 1);

        let found = session.find_by_id(Some(car.id)).await.expect("find failed");
        assert_eq!(
            found,
            vec![Car {
                make: "Toyota".into(),
                ..car.clone()
            }]
        );

        assert_eq!(session.soft_delete(car.id).await.expect("delete failed"), 1);
        let active = session.list_active().await.expect("list failed");
        assert!(active.iter().all(|c| c.id != car.id));
        let stored = session.find_by_id(Some(car.id)).await.expect("find failed");
        assert_eq!(stored[0].deleted_flag, 1);

        let err = session
            .insert(&NewCar {
                make: None,
                model: Some(model),
                year: Some(2020),
                deleted_flag: Some(0),
            })
            .await
            .expect_err("NULL make should be rejected in TRADITIONAL mode");
        assert!(err.is_rejected_data(), "unexpected error: {}", err);
    }
}
