//! Prompt templates keyed by case of use.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::data::comments::Comment;

/// Case of use for sentiment classification of review comments.
pub const SENTIMENT_ANALYSIS: &str = "analise_sentimento";

const COMMENTS_PLACEHOLDER: &str = "{comments}";

static TEMPLATES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([(
        SENTIMENT_ANALYSIS,
        concat!(
            "Analisar o sentimento dos seguintes comentários (positivo, negativo, neutro):\n{comments}. ",
            "O resultado deve ser estritamente um JSON estruturado com os seguintes campos: ",
            "'Tabela de Sentimentos' (um dicionário com a contagem de cada sentimento), ",
            "'Comentários por Tópicos' (um dicionário com listas de comentários categorizados por sentimento e obrigatoriamente a data do comentário), ",
            "e 'Análise para o Conselho Executivo' (um texto de no máximo 10 linhas). ",
            "Não inclua nenhum texto adicional fora do JSON."
        ),
    )])
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("no prompt template for case of use {0:?}")]
    UnknownCaseOfUse(String),
}

/// Template for a case of use; empty when the key is unknown.
pub fn template(case_of_use: &str) -> &'static str {
    TEMPLATES.get(case_of_use).copied().unwrap_or("")
}

/// One `"<date> - <content>"` line per comment.
pub fn format_comments(comments: &[Comment]) -> String {
    comments
        .iter()
        .map(|c| format!("{} - {}", c.date, c.content))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(template: &str, comments: &[Comment]) -> String {
    template.replace(COMMENTS_PLACEHOLDER, &format_comments(comments))
}

/// Render the prompt for a case of use, rejecting unknown keys.
pub fn build_prompt(case_of_use: &str, comments: &[Comment]) -> Result<String, PromptError> {
    let template = template(case_of_use);
    if template.is_empty() {
        return Err(PromptError::UnknownCaseOfUse(case_of_use.to_string()));
    }
    Ok(render(template, comments))
}
