//! `car` table bootstrap

use sqlx::MySqlPool;

/// Create the `car` table if it does not exist yet.
pub async fn ensure_car_table(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    tracing::info!("Ensuring car table exists");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS car (
            id INT NOT NULL AUTO_INCREMENT,
            make VARCHAR(255) NOT NULL,
            model VARCHAR(255) NOT NULL,
            year INT NOT NULL,
            deleted_flag TINYINT(1) NOT NULL DEFAULT 0,
            PRIMARY KEY (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
