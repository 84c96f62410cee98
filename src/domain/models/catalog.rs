use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    pub unique: Option<bool>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    #[serde(rename = "enum")]
    pub allowed_values: Option<Vec<Value>>,
}

impl FieldConstraints {
    pub fn unique() -> Self {
        Self {
            unique: Some(true),
            ..Self::default()
        }
    }

    pub fn one_of(values: Vec<Value>) -> Self {
        Self {
            allowed_values: Some(values),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub nullable: bool,
    pub description: String,
    pub constraints: Option<FieldConstraints>,
    pub business_definition: Option<String>,
    #[serde(default)]
    pub pii: bool,
    #[serde(default)]
    pub sample_values: Vec<Value>,
}

impl SchemaField {
    pub fn new(
        name: impl Into<String>,
        field_type: impl Into<String>,
        nullable: bool,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            nullable,
            description: description.into(),
            constraints: None,
            business_definition: None,
            pii: false,
            sample_values: Vec::new(),
        }
    }

    pub fn with_constraints(mut self, constraints: FieldConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_business_definition(mut self, definition: impl Into<String>) -> Self {
        self.business_definition = Some(definition.into());
        self
    }

    pub fn with_pii(mut self) -> Self {
        self.pii = true;
        self
    }

    pub fn with_sample_values(mut self, values: Vec<Value>) -> Self {
        self.sample_values = values;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRelationship {
    pub target_schema: String,
    pub kind: RelationshipKind,
    pub foreign_key: String,
    pub target_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    pub name: String,
    pub description: String,
    pub fields: Vec<SchemaField>,
    pub primary_key: Option<Vec<String>>,
    pub indexes: Option<Vec<Vec<String>>>,
    pub relationships: Option<Vec<SchemaRelationship>>,
}

impl DataSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            fields,
            primary_key: None,
            indexes: None,
            relationships: None,
        }
    }

    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = Some(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_indexes(mut self, indexes: &[&[&str]]) -> Self {
        self.indexes = Some(
            indexes
                .iter()
                .map(|index| index.iter().map(|c| c.to_string()).collect())
                .collect(),
        );
        self
    }

    pub fn with_relationship(mut self, relationship: SchemaRelationship) -> Self {
        self.relationships
            .get_or_insert_with(Vec::new)
            .push(relationship);
        self
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn pii_fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.iter().filter(|f| f.pii)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    /// 0 to 100.
    pub score: f64,
    pub completeness: f64,
    pub accuracy: f64,
    pub last_validated: DateTime<Utc>,
    pub issues: Vec<String>,
}

impl DataQuality {
    pub fn new(score: f64, completeness: f64, accuracy: f64) -> Self {
        Self {
            score,
            completeness,
            accuracy,
            last_validated: Utc::now(),
            issues: Vec::new(),
        }
    }

    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.issues = issues;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub schema: DataSchema,
    pub location: String,
    pub format: Option<String>,
    /// Bytes.
    pub size: Option<u64>,
    pub record_count: Option<u64>,
    pub last_updated: DateTime<Utc>,
    pub update_frequency: Option<String>,
    pub quality: DataQuality,
    pub owner: String,
    pub tags: Vec<String>,
    pub sample_data: Option<Vec<Value>>,
}

impl Dataset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        schema: DataSchema,
        location: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            schema,
            location: location.into(),
            format: None,
            size: None,
            record_count: None,
            last_updated: Utc::now(),
            update_frequency: None,
            quality: DataQuality::new(100.0, 100.0, 100.0),
            owner: owner.into(),
            tags: Vec::new(),
            sample_data: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_size(mut self, bytes: u64) -> Self {
        self.size = Some(bytes);
        self
    }

    pub fn with_record_count(mut self, count: u64) -> Self {
        self.record_count = Some(count);
        self
    }

    pub fn with_update_frequency(mut self, frequency: impl Into<String>) -> Self {
        self.update_frequency = Some(frequency.into());
        self
    }

    pub fn with_quality(mut self, quality: DataQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_sample_data(mut self, rows: Vec<Value>) -> Self {
        self.sample_data = Some(rows);
        self
    }

    /// Up to `limit` sample rows; empty when the dataset carries none.
    pub fn sample_rows(&self, limit: usize) -> Vec<Value> {
        self.sample_data
            .as_deref()
            .map(|rows| rows.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Case-insensitive substring match on name, description, or any tag.
    ///
    /// `lower_query` must already be lowercased.
    pub fn matches_query(&self, lower_query: &str) -> bool {
        self.name.to_lowercase().contains(lower_query)
            || self.description.to_lowercase().contains(lower_query)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(lower_query))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub policy: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataCatalog {
    pub datasets: Vec<Dataset>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub total_records: Option<u64>,
    pub data_retention: Option<RetentionPolicy>,
}

impl DataCatalog {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self {
            datasets,
            ..Self::default()
        }
    }

    /// First dataset carrying `id`. Ids are expected to be unique within a catalog.
    pub fn find(&self, id: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}
