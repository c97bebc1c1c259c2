use crate::domain::persistence::Persistence;
use crate::domain::schema::schema_tables;
use crate::domain::tables::{Column, ForeignKeyConstraint, Index, OnDelete, Table};

pub trait MigrationStep {
    fn ctx(&self) -> &str;
    fn ddls(self) -> Vec<String>;
}

pub struct CreateTableStep {
    ctx: String,
    ddls: Vec<String>,
}

impl CreateTableStep {
    fn new(database_schema: &str, table: &Table) -> Self {
        let ddls = create_table_ddl(database_schema, table);
        Self {
            ctx: format!("CREATE TABLE {}", table.name),
            ddls,
        }
    }
}

impl MigrationStep for CreateTableStep {
    fn ctx(&self) -> &str {
        &self.ctx
    }

    fn ddls(self) -> Vec<String> {
        self.ddls
    }
}

/// Brings the database schema up to the tables the service expects
#[derive(Clone)]
pub struct Migration<P: Persistence> {
    persistence: P,
}

impl<P: Persistence> Migration<P> {
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    pub async fn migrate(&self) -> Result<usize, anyhow::Error> {
        let steps = migration_steps(&self.persistence).await?;
        let count = steps.len();
        self.persistence.apply_migration_steps(steps).await?;
        Ok(count)
    }
}

/// One create step for every table missing from the database
pub async fn migration_steps(
    persistence: &impl Persistence,
) -> Result<Vec<CreateTableStep>, anyhow::Error> {
    let database_schema = persistence.database_schema();
    let actual_schema = persistence.load().await?;

    let steps = schema_tables()
        .iter()
        .filter(|table| !actual_schema.contains(&table.name))
        .map(|table| CreateTableStep::new(database_schema, table))
        .collect();

    Ok(steps)
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(format!("\"{}\"", column.name));
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(",");

    let table_ddl = format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    let mut ddls = vec![table_ddl];

    for fk in table.foreign_keys.iter() {
        ddls.push(create_fk_ddl(schema, fk));
    }

    for index in table.indexes.iter() {
        ddls.push(create_index_ddl(schema, index));
    }

    ddls
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type);
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = &column.default_value {
        sql.push_str(format!(" DEFAULT {}", default_value).as_str());
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    sql
}

fn create_fk_ddl(schema: &str, fk: &ForeignKeyConstraint) -> String {
    let on_delete = match fk.on_delete {
        OnDelete::Cascade => "CASCADE",
        OnDelete::SetNull => "SET NULL",
    };
    format!(
        "ALTER TABLE \"{}\".\"{}\" ADD CONSTRAINT \"{}_{}_fkey\" FOREIGN KEY (\"{}\") REFERENCES \"{}\".\"{}\" (\"{}\") ON DELETE {}",
        schema,
        fk.table_name,
        fk.table_name,
        fk.column_name,
        fk.column_name,
        schema,
        fk.referenced_table_name,
        fk.referenced_column_name,
        on_delete
    )
}

fn create_index_ddl(schema: &str, index: &Index) -> String {
    let columns_sql = index
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    let (kind, suffix) = if index.unique {
        ("UNIQUE INDEX", "key")
    } else {
        ("INDEX", "idx")
    };
    let mut ddl = format!(
        "CREATE {} \"{}_{}_{}\" ON \"{}\".\"{}\" ({})",
        kind,
        index.table_name,
        index.columns.join("_"),
        suffix,
        schema,
        index.table_name,
        columns_sql
    );
    if let Some(predicate) = &index.predicate {
        ddl.push_str(&format!(" WHERE {}", predicate));
    }
    ddl
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct FakePersistence {
        existing: HashSet<String>,
        applied: Arc<Mutex<Vec<String>>>,
    }

    impl Persistence for FakePersistence {
        async fn load(&self) -> Result<HashSet<String>, anyhow::Error> {
            Ok(self.existing.clone())
        }

        async fn apply_migration_steps(
            &self,
            steps: Vec<impl MigrationStep>,
        ) -> Result<(), anyhow::Error> {
            let mut applied = self.applied.lock().unwrap();
            for step in steps {
                applied.push(step.ctx().to_string());
            }
            Ok(())
        }

        fn database_schema(&self) -> &str {
            "public"
        }
    }

    #[test]
    fn composite_primary_key_and_defaults() {
        let table = Table::new(
            "venue_members",
            vec![
                Column::primary_key("venue_id", "UUID"),
                Column::primary_key("user_id", "UUID"),
                Column::new("role", "TEXT", true, false, Some("'VIEWER'")),
            ],
            vec![
                ForeignKeyConstraint::new("venue_members", "venue_id", "venues", "id"),
            ],
            Vec::new(),
        );

        let ddls = create_table_ddl("public", &table);

        assert_eq!(ddls.len(), 2);
        assert!(ddls[0].starts_with("CREATE TABLE \"public\".\"venue_members\""));
        assert!(ddls[0].contains("\"role\" TEXT NOT NULL DEFAULT 'VIEWER'"));
        assert!(ddls[0].contains("PRIMARY KEY(\"venue_id\",\"user_id\")"));
        assert!(ddls[1].ends_with("REFERENCES \"public\".\"venues\" (\"id\") ON DELETE CASCADE"));
    }

    #[test]
    fn partial_unique_index() {
        let index = Index::new("submissions", vec!["submission_type", "target_id"], true)
            .partial("status = 'SUBMITTED'");

        let ddl = create_index_ddl("app", &index);

        assert_eq!(
            ddl,
            "CREATE UNIQUE INDEX \"submissions_submission_type_target_id_key\" ON \"app\".\"submissions\" (\"submission_type\", \"target_id\") WHERE status = 'SUBMITTED'"
        );
    }

    #[test]
    fn set_null_foreign_key() {
        let fk = ForeignKeyConstraint::new("events", "venue_id", "venues", "id")
            .on_delete(OnDelete::SetNull);
        assert!(create_fk_ddl("public", &fk).ends_with("ON DELETE SET NULL"));
    }

    #[tokio::test]
    async fn creates_only_missing_tables() {
        let existing = schema_tables()
            .into_iter()
            .map(|t| t.name)
            .filter(|name| name != "submissions" && name != "notification_outbox")
            .collect();
        let persistence = FakePersistence {
            existing,
            ..Default::default()
        };

        let created = Migration::new(persistence.clone()).migrate().await.unwrap();

        assert_eq!(created, 2);
        let applied = persistence.applied.lock().unwrap();
        assert_eq!(
            *applied,
            vec![
                "CREATE TABLE submissions".to_string(),
                "CREATE TABLE notification_outbox".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn up_to_date_schema_needs_no_steps() {
        let persistence = FakePersistence {
            existing: schema_tables().into_iter().map(|t| t.name).collect(),
            ..Default::default()
        };

        let steps = migration_steps(&persistence).await.unwrap();

        assert!(steps.is_empty());
    }
}
