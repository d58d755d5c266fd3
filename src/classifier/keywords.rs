//! Keyword table and prefix scoring.
//!
//! Each category tag owns a set of stem prefixes. A stem counts once toward
//! every category that has at least one prefix it starts with. Prefix (not
//! exact) matching absorbs the inflections stemming leaves behind, at the cost
//! of some over-matching on short prefixes.

/// Intent buckets used by the rule-based scorer.
///
/// Declaration order is the tie-break order of the decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryTag {
    MeetingProposal,
    SupportRequest,
    DocumentRequest,
    StatusRequest,
    Question,
    DocumentSubmission,
    /// The only unproductive-leaning tag.
    Nonproductive,
}

impl CategoryTag {
    /// Every tag, in tie-break order.
    pub const ALL: [CategoryTag; 7] = [
        CategoryTag::MeetingProposal,
        CategoryTag::SupportRequest,
        CategoryTag::DocumentRequest,
        CategoryTag::StatusRequest,
        CategoryTag::Question,
        CategoryTag::DocumentSubmission,
        CategoryTag::Nonproductive,
    ];

    /// Productive-leaning tags, in tie-break order.
    pub const PRODUCTIVE: [CategoryTag; 6] = [
        CategoryTag::MeetingProposal,
        CategoryTag::SupportRequest,
        CategoryTag::DocumentRequest,
        CategoryTag::StatusRequest,
        CategoryTag::Question,
        CategoryTag::DocumentSubmission,
    ];

    pub fn is_productive(&self) -> bool {
        !matches!(self, CategoryTag::Nonproductive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::MeetingProposal => "meeting_proposal",
            CategoryTag::SupportRequest => "support_request",
            CategoryTag::DocumentRequest => "document_request",
            CategoryTag::StatusRequest => "status_request",
            CategoryTag::Question => "question",
            CategoryTag::DocumentSubmission => "document_submission",
            CategoryTag::Nonproductive => "nonproductive",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

// Multi-word entries can never match a single stem; they are kept as authored.
const STANDARD_KEYWORDS: &[(CategoryTag, &[&str])] = &[
    (
        CategoryTag::MeetingProposal,
        &["reuni", "marc", "agend", "convit", "dispon", "call", "encontr", "horario", "calend"],
    ),
    (
        CategoryTag::SupportRequest,
        &["problem", "err", "suport", "ajud", "cham", "dificuldad", "erro", "bug", "incident", "falh"],
    ),
    (
        CategoryTag::DocumentRequest,
        &[
            "precis", "envi", "mand", "compartilh", "poderi", "gostaria", "acess", "copi",
            "document", "relatori", "planilh", "apresent",
        ],
    ),
    (
        CategoryTag::StatusRequest,
        &["atualiz", "status", "pendenc", "praz", "andament", "posicion", "retorn", "novidad"],
    ),
    (
        CategoryTag::Question,
        &["duvid", "pergunt", "inform", "feedback", "esclarec", "gost", "sab"],
    ),
    (
        CategoryTag::DocumentSubmission,
        &["segue", "anex", "estou enviando", "está o arquivo"],
    ),
    (
        CategoryTag::Nonproductive,
        &[
            "obrig", "parabem", "agradec", "sucess", "bom dia", "boa tard", "boa noit", "feliz",
            "fest", "feriad", "confirmado", "ciente", "oportunidade", "exclusiv", "vagas",
            "demonstra", "concorrenc", "revolucion", "custos", "plataform", "especialist",
        ],
    ),
];

/// Per-category match counts for one classification call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreVector {
    counts: [u32; CategoryTag::ALL.len()],
}

impl ScoreVector {
    pub fn get(&self, tag: CategoryTag) -> u32 {
        self.counts[tag.index()]
    }

    pub fn increment(&mut self, tag: CategoryTag) {
        self.counts[tag.index()] += 1;
    }

    /// Set a score directly.
    pub fn with(mut self, tag: CategoryTag, score: u32) -> Self {
        self.counts[tag.index()] = score;
        self
    }

    /// `(tag, score)` pairs in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (CategoryTag, u32)> + '_ {
        CategoryTag::ALL.iter().map(|tag| (*tag, self.get(*tag)))
    }

    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }
}

/// Fixed mapping from category tag to stem prefixes.
#[derive(Debug, Clone, Copy)]
pub struct KeywordTable {
    entries: &'static [(CategoryTag, &'static [&'static str])],
}

impl KeywordTable {
    /// The built-in Portuguese business-email table.
    pub fn standard() -> Self {
        Self {
            entries: STANDARD_KEYWORDS,
        }
    }

    /// Build a table over custom entries (for testing).
    pub fn from_entries(entries: &'static [(CategoryTag, &'static [&'static str])]) -> Self {
        Self { entries }
    }

    /// Prefixes registered under `tag`; empty if the tag has no entry.
    pub fn prefixes(&self, tag: CategoryTag) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, prefixes)| *prefixes)
            .unwrap_or(&[])
    }

    /// Score a stem sequence. Every tag is present in the result (default 0).
    pub fn score<S: AsRef<str>>(&self, stems: &[S]) -> ScoreVector {
        let mut scores = ScoreVector::default();
        for stem in stems {
            let stem = stem.as_ref();
            for (tag, prefixes) in self.entries {
                // At most one hit per category per stem.
                if prefixes.iter().any(|prefix| stem.starts_with(prefix)) {
                    scores.increment(*tag);
                }
            }
        }
        scores
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::standard()
    }
}
