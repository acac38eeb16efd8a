//! Story records as they are stored in the `stories` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The columns a caller supplies when saving a story.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NewStory {
    pub title: String,
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub academic_grade: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vocab_list: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quiz_data: Vec<Value>,
}

/// A stored story, with the columns the store assigns on insert.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoryRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub story: NewStory,
}

impl NewStory {
    /// Maps a generated story payload onto the table's columns.
    ///
    /// Accepts both the camelCase keys the front end uses (`wordCount`,
    /// `vocabList`, `quizData`) and the column names. Missing values fall back
    /// to empty strings, zero and empty lists.
    pub fn from_generated(story: &Value) -> Self {
        Self {
            title: text_field(story, &["title"]),
            content: text_field(story, &["content"]),
            summary: text_field(story, &["summary"]),
            academic_grade: text_field(story, &["academic_grade"]),
            subject: text_field(story, &["subject"]),
            word_count: first_of(story, &["wordCount", "word_count"])
                .and_then(count_value)
                .unwrap_or(0),
            vocab_list: list_field(story, &["vocabList", "vocab_list"]),
            quiz_data: list_field(story, &["quizData", "quiz_data"]),
        }
    }
}

fn first_of<'a>(story: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| story.get(key))
        .find(|value| !value.is_null())
}

fn text_field(story: &Value, keys: &[&str]) -> String {
    match first_of(story, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn list_field(story: &Value, keys: &[&str]) -> Vec<Value> {
    first_of(story, keys)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

// Generators may emit counts as floats (`412.0`); fractions are truncated.
fn count_value(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

// Nullable columns come back as `null` rather than being omitted.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Hosted tables may use integer or uuid primary keys.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
