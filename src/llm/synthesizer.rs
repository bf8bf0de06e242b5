//! Natural language to SQL synthesis.
//!
//! Builds the generation prompt (schema text, question, optional few-shot
//! examples), calls the model, and normalizes the reply into a single-line
//! statement. The only programmatic safety contract is the SELECT prefix
//! guard; everything else is enforced by prompt instructions.

use crate::fewshot::ExamplePair;
use crate::llm::client::LlmClient;
use crate::types::{ChatError, Result};
use regex::Regex;
use std::fmt::Write;
use tracing::debug;

const SYSTEM_PROMPT: &str = "\
You are an expert PostgreSQL SQL query generator. Generate a valid PostgreSQL \
SELECT query that answers the user's question based ONLY on the provided table schema.

OUTPUT REQUIREMENTS
- Return ONLY the raw SQL query.
- The query MUST be written in a single line.
- Do NOT include explanations or comments.
- Do NOT format in markdown or wrap in ```sql fences.

DATABASE DIALECT
- Use PostgreSQL syntax ONLY.
- Do NOT use SQLite functions such as STRFTIME.
- When extracting date parts, use EXTRACT(YEAR FROM column) and ALWAYS cast the column using ::timestamp.

FORMATTING RULES
- Always wrap table names in double quotes.
- Always wrap column names in double quotes.
- Do NOT use table aliases.
- If selecting columns with identical names from different tables, use column aliases wrapped in double quotes.
- Do NOT use column aliases inside GROUP BY; repeat the full expression instead.

QUERY RULES
- Only generate SELECT queries. Never generate INSERT, UPDATE, DELETE, DROP, ALTER, or TRUNCATE.
- Use ONLY the tables and columns provided in the schema. Do NOT hallucinate tables or columns.
- Always use proper JOIN conditions based on foreign keys.
- If aggregation is required, use GROUP BY correctly.
- If the query may return many rows, add LIMIT 20 at the end.";

/// Prompt-driven SQL generator with response cleanup.
pub struct SqlSynthesizer {
    fences: Regex,
    line_breaks: Regex,
}

impl SqlSynthesizer {
    /// Create a synthesizer.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Config` if the cleanup patterns fail to compile.
    pub fn new() -> Result<Self> {
        let fences = Regex::new(r"(?i)```(?:sql)?")
            .map_err(|e| ChatError::Config(format!("invalid fence pattern: {}", e)))?;
        let line_breaks = Regex::new(r"[ \t]*[\r\n]+[ \t]*")
            .map_err(|e| ChatError::Config(format!("invalid line-break pattern: {}", e)))?;

        Ok(Self {
            fences,
            line_breaks,
        })
    }

    /// Generate a guarded single-line SELECT statement for a question.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Llm` if the model call fails and
    /// `ChatError::RejectedQuery` if the cleaned reply is not a SELECT.
    pub async fn synthesize(
        &self,
        llm: &LlmClient,
        schema_text: &str,
        question: &str,
        examples: &[ExamplePair],
    ) -> Result<String> {
        let user_prompt = Self::build_user_prompt(schema_text, question, examples);
        let raw = llm.call(SYSTEM_PROMPT, &user_prompt).await?;
        let sql = self.clean(&raw);

        debug!(sql = %sql, "generated SQL");

        if !is_select_statement(&sql) {
            return Err(ChatError::RejectedQuery(sql));
        }

        Ok(sql)
    }

    /// Assemble the user prompt: optional few-shot block, then schema and
    /// question.
    pub fn build_user_prompt(
        schema_text: &str,
        question: &str,
        examples: &[ExamplePair],
    ) -> String {
        let mut prompt = String::new();

        if !examples.is_empty() {
            prompt.push_str("EXAMPLES\n");
            for pair in examples {
                // write! to a String cannot fail
                let _ = write!(
                    prompt,
                    "\nUser Question:\n{}\n\nSQL Query:\n{}\n",
                    pair.question, pair.sql
                );
            }
            prompt.push('\n');
        }

        let _ = write!(
            prompt,
            "TABLE SCHEMA\n{}\n\nUSER QUESTION\n{}",
            schema_text, question
        );

        prompt
    }

    /// Normalize a model reply into a single-line statement: strip code
    /// fences, join line breaks with single spaces, trim.
    pub fn clean(&self, raw: &str) -> String {
        let without_fences = self.fences.replace_all(raw, "");
        let single_line = self.line_breaks.replace_all(without_fences.trim(), " ");
        single_line.trim().to_string()
    }
}

/// Case-insensitive SELECT prefix check.
///
/// Deliberately strict: no trimming and no SQL parsing. The synthesizer
/// always hands this fence-stripped, trimmed text.
pub fn is_select_statement(sql: &str) -> bool {
    sql.get(..6)
        .map(|prefix| prefix.eq_ignore_ascii_case("select"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer() -> SqlSynthesizer {
        SqlSynthesizer::new().unwrap()
    }

    #[test]
    fn test_clean_strips_sql_fences() {
        assert_eq!(synthesizer().clean("```sql\nSELECT 1;\n```"), "SELECT 1;");
    }

    #[test]
    fn test_clean_strips_uppercase_and_bare_fences() {
        let s = synthesizer();
        assert_eq!(s.clean("```SQL\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(s.clean("```\nSELECT 1;\n```"), "SELECT 1;");
    }

    #[test]
    fn test_clean_trims_unfenced_reply() {
        assert_eq!(synthesizer().clean("  SELECT 1;  \n"), "SELECT 1;");
    }

    #[test]
    fn test_clean_collapses_to_single_line() {
        let raw = "SELECT \"Name\",\n       \"Total\"\nFROM \"Invoice\";";
        assert_eq!(
            synthesizer().clean(raw),
            "SELECT \"Name\", \"Total\" FROM \"Invoice\";"
        );
    }

    #[test]
    fn test_select_guard() {
        assert!(is_select_statement("SELECT 1;"));
        assert!(is_select_statement("select 1;"));
        assert!(!is_select_statement("DROP TABLE X;"));
        assert!(!is_select_statement("  select 1;"));
        assert!(!is_select_statement(""));
        assert!(!is_select_statement("sel"));
    }

    #[test]
    fn test_guard_rejects_comment_prefixed_statement() {
        assert!(!is_select_statement("-- note\nselect 1;"));
    }

    #[test]
    fn test_user_prompt_contains_schema_question_and_examples() {
        let examples = vec![ExamplePair {
            question: "Count total invoices".to_string(),
            sql: r#"SELECT COUNT(*) FROM "Invoice";"#.to_string(),
        }];
        let prompt = SqlSynthesizer::build_user_prompt(
            "\nTable: Invoice\n  - Total\n",
            "how many invoices?",
            &examples,
        );

        assert!(prompt.starts_with("EXAMPLES"));
        assert!(prompt.contains("Count total invoices"));
        assert!(prompt.contains("Table: Invoice"));
        assert!(prompt.ends_with("how many invoices?"));
    }

    #[test]
    fn test_user_prompt_without_examples_has_no_examples_block() {
        let prompt = SqlSynthesizer::build_user_prompt("schema", "question", &[]);
        assert!(prompt.starts_with("TABLE SCHEMA"));
        assert!(!prompt.contains("EXAMPLES"));
    }
}
