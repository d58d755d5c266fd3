//! Analysis prompt and parsing of free-form model output.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::pipeline::types::{Category, ClassificationResult};

/// Worked examples shown to the model: `(email, expected JSON)`.
const FEW_SHOT_EXAMPLES: [(&str, &str); 2] = [
    (
        "Olá, preciso de uma atualização sobre o chamado 12345. O sistema retorna erro ao subir anexos.",
        r#"{"category": "Produtivo", "suggested_response": "Olá, obrigado pelo contato. Vamos verificar e retornaremos com um posicionamento."}"#,
    ),
    (
        "Parabéns pelo lançamento, muito sucesso a todos!",
        r#"{"category": "Improdutivo", "suggested_response": "Olá, agradecemos a mensagem!"}"#,
    ),
];

/// Build the single-turn classification prompt for `text`.
pub fn build_analysis_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(768 + text.len());

    prompt.push_str(
        "Você é um assistente que classifica e-mails corporativos como 'Produtivo' \
         (exige alguma ação ou resposta) ou 'Improdutivo' (não exige ação) e sugere uma \
         resposta profissional em português. Responda APENAS com um objeto JSON válido com \
         as chaves: category (Produtivo|Improdutivo) e suggested_response (string).\n\n",
    );

    prompt.push_str("EXEMPLOS:\n");
    for (email, json) in FEW_SHOT_EXAMPLES {
        prompt.push_str(&format!("EMAIL: {email}\nSAÍDA_JSON: {json}\n\n"));
    }

    prompt.push_str("Analise o e-mail a seguir e retorne SOMENTE o JSON:\n");
    prompt.push_str(text);
    prompt
}

// ── Response parsing ────────────────────────────────────────────────

/// First `{` through the last `}`, newlines included.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex is valid"));

/// Locate the outermost-braced span in model output (handles prose and
/// markdown fences around the object).
pub fn extract_json_object(text: &str) -> Option<&str> {
    JSON_OBJECT.find(text).map(|m| m.as_str())
}

/// Shape the model is asked to return.
#[derive(Debug, Deserialize)]
struct RemoteClassification {
    category: Category,
    suggested_response: String,
}

/// Parse model output into a result.
///
/// Fails when no braced span exists, the span is not valid JSON, the category
/// is not one of the two labels, or the suggested response is blank.
pub fn parse_classification(raw: &str) -> Result<ClassificationResult, String> {
    let json = extract_json_object(raw).ok_or_else(|| "no JSON object in response".to_string())?;
    let parsed: RemoteClassification =
        serde_json::from_str(json).map_err(|e| format!("JSON parse error: {e}"))?;

    let suggested_response = parsed.suggested_response.trim();
    if suggested_response.is_empty() {
        return Err("empty suggested_response".into());
    }

    Ok(ClassificationResult::new(parsed.category, suggested_response))
}
