use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::prelude::*;
use std::fs::create_dir_all;
use std::{fs, path};

mod m20251107_000001_create_kv_entry;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251107_000001_create_kv_entry::Migration)]
    }
}

pub async fn init_sqlite() -> DatabaseConnection {
    let path = path::Path::new("data/rspps.db");
    if !path.exists() {
        if let Some(parent) = path.parent() {
            create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }
    let db = Database::connect("sqlite://data/rspps.db")
        .await
        .expect("failed to connect sqlite");

    db
}
