use std::path::PathBuf;

use anyhow::bail;
use bson::{oid::ObjectId, Bson, Document};
use clap::{Args, Parser, Subcommand};
use docstore::{model::document, ConnectionRegistry, MongoClient, DEFAULT_CONNECTION};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "docstore", about = "Run one operation against a configured MongoDB connection")]
pub struct Cli {
    /// TOML file with `[connections.<name>]` tables. Without it only the
    /// `default` connection from `MONGODB_*` variables is available.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = DEFAULT_CONNECTION)]
    pub connection: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the connections named in the settings file
    Connections,
    #[command(flatten)]
    Op(Operation),
}

/// Filters and documents are extended JSON, e.g. `{"_id": {"$oid": "..."}}`.
#[derive(Subcommand, Debug)]
pub enum Operation {
    /// Connect and report success
    Ping,
    Count {
        table: String,
        #[command(flatten)]
        target: Target,
    },
    Find {
        table: String,
        #[command(flatten)]
        target: Target,
    },
    FindOne {
        table: String,
        #[command(flatten)]
        target: Target,
    },
    Insert {
        table: String,
        document: String,
    },
    Update {
        table: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        setter: String,
    },
    UpdateMany {
        table: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        setter: String,
    },
    /// Set fields on the first match, keeping the others
    Set {
        table: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        fields: String,
    },
    /// Replace the first match and print the document it replaced
    Replace {
        table: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        document: String,
    },
    Delete {
        table: String,
        #[command(flatten)]
        target: Target,
    },
}

/// Which documents an operation applies to. No filter and no `--id`
/// matches everything.
#[derive(Args, Debug)]
pub struct Target {
    pub filter: Option<String>,

    /// Match by `_id` (24 hex digits); repeat for several
    #[arg(long = "id", conflicts_with = "filter")]
    pub ids: Vec<String>,
}

impl Target {
    pub fn to_filter(&self) -> anyhow::Result<Document> {
        if !self.ids.is_empty() {
            let ids = self
                .ids
                .iter()
                .map(ObjectId::parse_str)
                .collect::<Result<Vec<_>, _>>()?;

            return Ok(document::query_ids(&ids));
        }

        match &self.filter {
            Some(filter) => parse_document(filter),
            None => Ok(Document::new()),
        }
    }
}

impl Operation {
    pub async fn run(&self, client: &MongoClient) -> anyhow::Result<String> {
        let output = match self {
            Operation::Ping => json!({ "ok": 1, "connection": client.name() }),
            Operation::Count { table, target } => {
                let count = client.find_count(table, target.to_filter()?).await?;
                json!({ "count": count })
            }
            Operation::Find { table, target } => {
                let mut found: Vec<Document> = Vec::new();
                client.find_and_fill(table, target.to_filter()?, &mut found).await?;

                Value::Array(found.into_iter().map(to_json).collect())
            }
            Operation::FindOne { table, target } => {
                let found: Option<Document> = client.find_one(table, target.to_filter()?).await?;
                found.map(to_json).unwrap_or(Value::Null)
            }
            Operation::Insert { table, document } => {
                let res = client.save(table, &parse_document(document)?).await?;
                json!({ "inserted_id": res.inserted_id.into_relaxed_extjson() })
            }
            Operation::Update { table, target, setter } => {
                let res = client
                    .update(table, target.to_filter()?, parse_document(setter)?)
                    .await?;
                json!({ "matched": res.matched_count, "modified": res.modified_count })
            }
            Operation::UpdateMany { table, target, setter } => {
                let res = client
                    .update_many(table, target.to_filter()?, parse_document(setter)?)
                    .await?;
                json!({ "matched": res.matched_count, "modified": res.modified_count })
            }
            Operation::Set { table, target, fields } => {
                let setter = document::set_fields(&parse_document(fields)?)?;
                let res = client.update(table, target.to_filter()?, setter).await?;
                json!({ "matched": res.matched_count, "modified": res.modified_count })
            }
            Operation::Replace { table, target, document } => {
                let previous = client
                    .find_one_and_replace(table, target.to_filter()?, &parse_document(document)?)
                    .await?;
                previous.map(to_json).unwrap_or(Value::Null)
            }
            Operation::Delete { table, target } => {
                let res = client.delete(table, target.to_filter()?).await?;
                json!({ "deleted": res.deleted_count })
            }
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

pub fn list_connections(registry: &ConnectionRegistry) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&registry.configured_names())?)
}

pub fn parse_document(source: &str) -> anyhow::Result<Document> {
    let value: Value = serde_json::from_str(source)?;

    match Bson::try_from(value)? {
        Bson::Document(doc) => Ok(doc),
        other => bail!("expected a JSON object, got {}", other),
    }
}

fn to_json(doc: Document) -> Value {
    Bson::Document(doc).into_relaxed_extjson()
}
