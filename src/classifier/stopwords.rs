//! Portuguese stopword list.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Common Portuguese function words (articles, prepositions, pronouns and
/// the inflections of ser/estar/ter/haver) that carry no intent signal.
const PORTUGUESE_STOP_WORDS: &[&str] = &[
    "a", "à", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "às",
    "até", "com", "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do",
    "dos", "e", "é", "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "éramos",
    "essa", "essas", "esse", "esses", "esta", "está", "estamos", "estão", "estar", "estas",
    "estava", "estavam", "estávamos", "este", "esteja", "estejam", "estejamos", "estes",
    "esteve", "estive", "estivemos", "estiver", "estivera", "estiveram", "estivéramos",
    "estiverem", "estivermos", "estivesse", "estivessem", "estivéssemos", "estou", "eu",
    "foi", "fomos", "for", "fora", "foram", "fôramos", "forem", "formos", "fosse", "fossem",
    "fôssemos", "fui", "há", "haja", "hajam", "hajamos", "hão", "havemos", "haver", "hei",
    "houve", "houvemos", "houver", "houvera", "houverá", "houveram", "houvéramos",
    "houverão", "houverei", "houverem", "houveremos", "houveria", "houveriam",
    "houveríamos", "houvermos", "houvesse", "houvessem", "houvéssemos", "isso", "isto",
    "já", "lhe", "lhes", "mais", "mas", "me", "mesmo", "meu", "meus", "minha", "minhas",
    "muito", "na", "não", "nas", "nem", "no", "nos", "nós", "nossa", "nossas", "nosso",
    "nossos", "num", "numa", "o", "os", "ou", "para", "pela", "pelas", "pelo", "pelos",
    "por", "qual", "quando", "que", "quem", "são", "se", "seja", "sejam", "sejamos", "sem",
    "ser", "será", "serão", "serei", "seremos", "seria", "seriam", "seríamos", "seu",
    "seus", "só", "somos", "sou", "sua", "suas", "também", "te", "tem", "tém", "temos",
    "tenha", "tenham", "tenhamos", "tenho", "ter", "terá", "terão", "terei", "teremos",
    "teria", "teriam", "teríamos", "teu", "teus", "teve", "tinha", "tinham", "tínhamos",
    "tive", "tivemos", "tiver", "tivera", "tiveram", "tivéramos", "tiverem", "tivermos",
    "tivesse", "tivessem", "tivéssemos", "tu", "tua", "tuas", "um", "uma", "você", "vocês",
    "vos",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| PORTUGUESE_STOP_WORDS.iter().copied().collect());

/// Whether a lowercased token is a Portuguese stopword.
pub fn is_stopword(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Number of distinct stopwords loaded.
pub fn len() -> usize {
    STOP_WORDS.len()
}
