//! Decision policy: category scores → label and canned reply.

use super::keywords::{CategoryTag, ScoreVector};
use crate::pipeline::types::{Category, ClassificationResult};

const MEETING_PROPOSAL_RESPONSE: &str = "Olá,\n\nObrigado pelo contato. Vou verificar a disponibilidade na agenda e retorno em breve para confirmarmos.\n\nAtenciosamente,\nEquipe";

const SUPPORT_REQUEST_RESPONSE: &str = "Olá,\n\nRecebemos sua solicitação de suporte. Nossa equipe técnica já está analisando o ocorrido e retornaremos com uma solução o mais breve possível.\n\nAtenciosamente,\nEquipe";

const DOCUMENT_REQUEST_RESPONSE: &str = "Olá,\n\nRecebemos sua solicitação. Estamos localizando o documento e o enviaremos assim que possível.\n\nAtenciosamente,\nEquipe";

const STATUS_REQUEST_RESPONSE: &str = "Olá,\n\nObrigado por solicitar uma atualização. Estamos verificando o andamento da sua requisição e enviaremos um posicionamento detalhado em breve.\n\nAtenciosamente,\nEquipe";

const QUESTION_RESPONSE: &str = "Olá,\n\nRecebemos sua dúvida. Nossa equipe está buscando a informação para lhe responder da forma mais completa possível e retornará em breve.\n\nAtenciosamente,\nEquipe";

const DOCUMENT_SUBMISSION_RESPONSE: &str = "Olá,\n\nAgradecemos o envio. O material foi recebido e será analisado por nossa equipe. Retornaremos caso seja necessário algum complemento.\n\nAtenciosamente,\nEquipe";

/// Reply for a productive email whose best tag has no dedicated response.
pub const DEFAULT_PRODUCTIVE_RESPONSE: &str = "Olá,\n\nObrigado pelo contato. Recebemos sua mensagem e daremos o devido tratamento. Retornaremos em breve.\n\nAtenciosamente,\nEquipe";

/// Reply for every unproductive email.
pub const DEFAULT_UNPRODUCTIVE_RESPONSE: &str = "Olá,\n\nAgradecemos a mensagem. No momento, esta comunicação não requer uma ação imediata. Caso precise de suporte, por favor, envie um novo e-mail com mais detalhes.\n\nAtenciosamente,\nEquipe";

/// Dedicated reply for a category tag, if it has one.
pub fn response_for(tag: CategoryTag) -> Option<&'static str> {
    match tag {
        CategoryTag::MeetingProposal => Some(MEETING_PROPOSAL_RESPONSE),
        CategoryTag::SupportRequest => Some(SUPPORT_REQUEST_RESPONSE),
        CategoryTag::DocumentRequest => Some(DOCUMENT_REQUEST_RESPONSE),
        CategoryTag::StatusRequest => Some(STATUS_REQUEST_RESPONSE),
        CategoryTag::Question => Some(QUESTION_RESPONSE),
        CategoryTag::DocumentSubmission => Some(DOCUMENT_SUBMISSION_RESPONSE),
        CategoryTag::Nonproductive => None,
    }
}

/// Highest-scoring productive tag with a positive score.
///
/// Ties go to the tag that comes first in [`CategoryTag::PRODUCTIVE`].
pub fn best_productive(scores: &ScoreVector) -> Option<(CategoryTag, u32)> {
    let mut best: Option<(CategoryTag, u32)> = None;
    for (tag, score) in scores.iter() {
        if !tag.is_productive() || score == 0 {
            continue;
        }
        // Strictly greater, so the earlier tag keeps a tie.
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((tag, score));
        }
    }
    best
}

/// Turn a score vector into the final result.
///
/// Productive iff some productive tag scored and its score is at least the
/// nonproductive score. No signal at all is Unproductive.
pub fn decide(scores: &ScoreVector) -> ClassificationResult {
    let nonproductive = scores.get(CategoryTag::Nonproductive);

    match best_productive(scores) {
        Some((tag, score)) if score >= nonproductive => ClassificationResult::new(
            Category::Productive,
            response_for(tag).unwrap_or(DEFAULT_PRODUCTIVE_RESPONSE),
        ),
        _ => ClassificationResult::new(Category::Unproductive, DEFAULT_UNPRODUCTIVE_RESPONSE),
    }
}
