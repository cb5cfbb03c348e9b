// src/models/question.rs

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::prelude::FromRow;

/// Upper bound (in characters) of the answer columns in the `questions` table.
pub const MAX_ANSWER_CHARS: usize = 255;

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Question {
    /// Assigned by the store on insert.
    pub id: i64,

    /// The text content of the question.
    pub question: String,

    pub answer_a: String,
    pub answer_b: String,
    pub answer_c: String,
    pub answer_d: String,

    /// Expected to equal one of the four answers. Not checked.
    pub correct_answer: String,
}

/// DTO for submitting a question. The store assigns the identifier.
///
/// Missing and `null` fields decode to the empty string, a wrongly typed
/// field is a decode error. Keys are also accepted capitalized
/// (`Question`, `Answer_a`) or upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewQuestion {
    #[serde(alias = "Question", alias = "QUESTION", deserialize_with = "null_as_empty")]
    pub question: String,
    #[serde(alias = "Answer_a", alias = "ANSWER_A", deserialize_with = "null_as_empty")]
    pub answer_a: String,
    #[serde(alias = "Answer_b", alias = "ANSWER_B", deserialize_with = "null_as_empty")]
    pub answer_b: String,
    #[serde(alias = "Answer_c", alias = "ANSWER_C", deserialize_with = "null_as_empty")]
    pub answer_c: String,
    #[serde(alias = "Answer_d", alias = "ANSWER_D", deserialize_with = "null_as_empty")]
    pub answer_d: String,
    #[serde(
        alias = "Correct_answer",
        alias = "CORRECT_ANSWER",
        deserialize_with = "null_as_empty"
    )]
    pub correct_answer: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewQuestion {
    /// Attaches a store-assigned identifier.
    pub fn with_id(self, id: i64) -> Question {
        Question {
            id,
            question: self.question,
            answer_a: self.answer_a,
            answer_b: self.answer_b,
            answer_c: self.answer_c,
            answer_d: self.answer_d,
            correct_answer: self.correct_answer,
        }
    }

    /// Returns the name of the first answer column whose value exceeds
    /// [`MAX_ANSWER_CHARS`], if any.
    pub fn oversized_field(&self) -> Option<&'static str> {
        [
            ("answer_a", &self.answer_a),
            ("answer_b", &self.answer_b),
            ("answer_c", &self.answer_c),
            ("answer_d", &self.answer_d),
            ("correct_answer", &self.correct_answer),
        ]
        .into_iter()
        .find(|(_, value)| value.chars().count() > MAX_ANSWER_CHARS)
        .map(|(name, _)| name)
    }
}

impl Question {
    /// Content of the record without its identifier.
    pub fn content(&self) -> NewQuestion {
        NewQuestion {
            question: self.question.clone(),
            answer_a: self.answer_a.clone(),
            answer_b: self.answer_b.clone(),
            answer_c: self.answer_c.clone(),
            answer_d: self.answer_d.clone(),
            correct_answer: self.correct_answer.clone(),
        }
    }
}
