//! Portuguese suffix-stripping stemmer.
//!
//! A rule-table stemmer in the RSLP family. A word passes through these steps
//! in order:
//!
//! 1. Plural reduction (only words ending in `s`)
//! 2. Feminine reduction (only words ending in `a` or `ã`)
//! 3. Adverb reduction (`-mente`)
//! 4. Augmentative/diminutive reduction
//! 5. Noun suffix reduction
//! 6. Verb suffix reduction, only when step 5 removed nothing
//! 7. Thematic vowel removal, only when steps 5 and 6 removed nothing
//!
//! Each step applies at most one rule: the first whose suffix matches, whose
//! remaining stem has at least `min_stem` characters, and whose exception list
//! does not contain the word. Diacritics are folded off the final stem so that
//! stems compare against plain ASCII keyword prefixes.
//!
//! ```
//! use automail::classifier::stemmer::stem;
//!
//! assert_eq!(stem("reuniões"), "reuni");
//! assert_eq!(stem("agendar"), "agend");
//! assert_eq!(stem("parabéns"), "parabem");
//! ```

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// A single suffix rewrite.
#[derive(Debug, Clone, Copy)]
struct Rule {
    suffix: &'static str,
    /// Minimum number of characters that must remain after removing `suffix`.
    min_stem: usize,
    replacement: &'static str,
    exceptions: &'static [&'static str],
}

const fn rule(suffix: &'static str, min_stem: usize) -> Rule {
    Rule {
        suffix,
        min_stem,
        replacement: "",
        exceptions: &[],
    }
}

const fn rewrite(suffix: &'static str, min_stem: usize, replacement: &'static str) -> Rule {
    Rule {
        suffix,
        min_stem,
        replacement,
        exceptions: &[],
    }
}

const fn except(
    suffix: &'static str,
    min_stem: usize,
    replacement: &'static str,
    exceptions: &'static [&'static str],
) -> Rule {
    Rule {
        suffix,
        min_stem,
        replacement,
        exceptions,
    }
}

// Within each table a longer suffix must precede any suffix it ends with.

const PLURAL: &[Rule] = &[
    rewrite("ns", 1, "m"),
    rewrite("ões", 3, "ão"),
    except("ães", 1, "ão", &["mães"]),
    except("ais", 1, "al", &["cais", "mais"]),
    rewrite("éis", 2, "el"),
    rewrite("eis", 2, "el"),
    rewrite("óis", 2, "ol"),
    except(
        "is",
        2,
        "il",
        &["lápis", "cais", "mais", "crúcis", "biquínis", "pois", "depois", "dois", "leis"],
    ),
    rewrite("les", 3, "l"),
    except("res", 3, "r", &["árvores"]),
    except(
        "s",
        2,
        "",
        &[
            "aliás", "pires", "lápis", "cais", "mais", "mas", "menos", "férias", "fezes",
            "pêsames", "crúcis", "gás", "atrás", "moisés", "através", "convés", "ês", "país",
            "após", "ambas", "ambos", "messias", "depois",
        ],
    ),
];

const FEMININE: &[Rule] = &[
    except(
        "ona",
        3,
        "ão",
        &["abandona", "lona", "iona", "cortisona", "monótona", "maratona", "acetona", "detona", "carona"],
    ),
    rewrite("ora", 3, "or"),
    except(
        "na",
        4,
        "no",
        &[
            "carona", "abandona", "lona", "iona", "cortisona", "monótona", "maratona", "acetona",
            "detona", "guiana", "campana", "grana", "caravana", "banana", "paisana",
        ],
    ),
    except("inha", 3, "inho", &["rainha", "linha", "minha"]),
    except("esa", 3, "ês", &["mesa", "obesa", "princesa", "turquesa", "ilesa", "pesa", "presa"]),
    except("osa", 3, "oso", &["mucosa", "prosa"]),
    rewrite("íaca", 3, "íaco"),
    except("ica", 3, "ico", &["dica"]),
    except("ada", 2, "ado", &["pitada"]),
    except("ida", 3, "ido", &["vida", "dúvida"]),
    except("ída", 3, "ido", &["recaída", "saída"]),
    except("ima", 3, "imo", &["vítima"]),
    except("iva", 3, "ivo", &["saliva", "oliva"]),
    except("eira", 3, "eiro", &["beira", "cadeira", "frigideira", "bandeira", "feira", "capoeira", "barreira", "fronteira", "besteira", "poeira"]),
    except("ã", 2, "ão", &["amanhã", "arapuã", "fã", "divã"]),
];

const ADVERB: &[Rule] = &[except("mente", 4, "", &["experimente"])];

const AUGMENTATIVE: &[Rule] = &[
    rule("díssimo", 5),
    rule("abilíssimo", 5),
    rule("íssimo", 3),
    rule("ésimo", 3),
    rule("érrimo", 4),
    rule("zinho", 2),
    rewrite("quinho", 4, "c"),
    rule("uinho", 4),
    rule("adinho", 3),
    except("inho", 3, "", &["caminho", "cominho"]),
    rule("alhão", 4),
    rule("uça", 4),
    except("aço", 4, "", &["antebraço"]),
    rule("aça", 4),
    rule("adão", 4),
    rule("idão", 4),
    except("ázio", 3, "", &["topázio"]),
    rule("arraz", 4),
    rule("zarrão", 3),
    rule("arrão", 4),
    rule("arra", 3),
    except("zão", 2, "", &["coalizão"]),
    except(
        "ão",
        3,
        "",
        &[
            "camarão", "chimarrão", "canção", "coração", "embrião", "grotão", "glutão", "ficção",
            "fogão", "feição", "furacão", "gamão", "lampião", "leão", "macacão", "nação", "órfão",
            "orgão", "patrão", "portão", "quinhão", "rincão", "tração", "falcão", "espião",
            "mamão", "folião", "cordão", "aptidão", "campeão", "colchão", "limão", "leilão",
            "melão", "barão", "milhão", "bilhão", "fusão", "cristão", "ilusão", "capitão",
            "estação", "senão",
        ],
    ),
];

const NOUN: &[Rule] = &[
    rule("encialista", 4),
    rule("alista", 5),
    except("agem", 3, "", &["coragem", "chantagem", "vantagem", "carruagem"]),
    rule("iamento", 4),
    except("amento", 3, "", &["firmamento", "fundamento", "departamento"]),
    rule("imento", 3),
    except("mento", 6, "", &["firmamento", "elemento", "complemento", "instrumento", "departamento"]),
    rule("alizado", 4),
    rule("atizado", 4),
    except("tizado", 4, "", &["alfabetizado"]),
    except("izado", 5, "", &["organizado", "pulverizado"]),
    except("ativo", 4, "", &["pejorativo", "relativo"]),
    except("tivo", 4, "", &["relativo"]),
    except("ivo", 4, "", &["passivo", "possessivo", "pejorativo", "positivo"]),
    except("ado", 2, "", &["grado"]),
    except(
        "ido",
        3,
        "",
        &["cândido", "consolido", "rápido", "decido", "tímido", "duvido", "marido"],
    ),
    rule("ador", 3),
    rule("edor", 3),
    except("idor", 4, "", &["ouvidor"]),
    except("dor", 4, "", &["ouvidor"]),
    except("sor", 4, "", &["assessor"]),
    rule("atoria", 5),
    except(
        "tor",
        3,
        "",
        &["benfeitor", "leitor", "editor", "pastor", "produtor", "promotor", "consultor"],
    ),
    except(
        "ior",
        2,
        "",
        &["interior", "anterior", "exterior", "melhor", "inferior", "posterior", "superior"],
    ),
    rule("abilidade", 5),
    rule("icionista", 4),
    rule("cionista", 5),
    rule("ionista", 5),
    rule("ionar", 5),
    rule("ional", 4),
    rule("ência", 3),
    except("ância", 4, "", &["ambulância"]),
    rule("edouro", 3),
    rewrite("queiro", 3, "c"),
    except("adeiro", 4, "", &["desfiladeiro"]),
    except("eiro", 3, "", &["desfiladeiro", "pioneiro", "mosteiro"]),
    rule("uoso", 3),
    except("oso", 3, "", &["precioso"]),
    rule("alizaç", 5),
    rule("atizaç", 5),
    rule("tizaç", 5),
    except("izaç", 5, "", &["organizaç"]),
    except("aç", 3, "", &["equaç", "relaç"]),
    except("iç", 3, "", &["eleiç"]),
    except(
        "ário",
        3,
        "",
        &["voluntário", "salário", "aniversário", "diário", "lionário", "armário"],
    ),
    rule("atório", 3),
    except(
        "rio",
        5,
        "",
        &["voluntário", "salário", "aniversário", "diário", "compulsório", "lionário", "próprio", "stério", "armário"],
    ),
    rule("ério", 6),
    rule("ês", 4),
    rule("eza", 3),
    rule("ez", 4),
    rule("esco", 4),
    except(
        "ante",
        2,
        "",
        &["gigante", "elefante", "adiante", "possante", "instante", "restaurante"],
    ),
    except("ástico", 4, "", &["eclesiástico"]),
    rule("alístico", 3),
    rule("áutico", 4),
    rule("êutico", 4),
    except(
        "tico",
        3,
        "",
        &[
            "político", "eclesiástico", "diagnostico", "prático", "doméstico", "diagnóstico",
            "idêntico", "alopático", "artístico", "autêntico", "eclético", "crítico", "critico",
        ],
    ),
    except("ico", 4, "", &["tico", "público", "explico"]),
    rule("ividade", 5),
    except("idade", 4, "", &["autoridade", "comunidade"]),
    except("oria", 4, "", &["categoria"]),
    rule("encial", 5),
    rule("ista", 4),
    rule("auta", 5),
    rewrite("quice", 4, "c"),
    except("ice", 4, "", &["cúmplice"]),
    rule("íaco", 3),
    except(
        "ente",
        4,
        "",
        &["freqüente", "alimente", "acrescente", "permanente", "oriente", "aparente"],
    ),
    rule("ense", 5),
    rule("inal", 3),
    rule("ano", 4),
    except("ável", 2, "", &["afável", "razoável", "potável", "vulnerável"]),
    except("ível", 3, "", &["possível"]),
    except("vel", 5, "", &["possível", "vulnerável", "solúvel"]),
    rewrite("bil", 3, "vel"),
    except("ura", 4, "", &["imatura", "acupuntura", "costura"]),
    rule("ural", 4),
    except("ual", 3, "", &["bissexual", "virtual", "visual", "pontual"]),
    rule("ial", 3),
    except(
        "al",
        4,
        "",
        &[
            "afinal", "animal", "estatal", "bissexual", "desleal", "fiscal", "formal", "pessoal",
            "liberal", "postal", "virtual", "visual", "pontual", "sideral", "sucursal",
        ],
    ),
    rule("alismo", 4),
    rule("ivismo", 4),
    except("ismo", 3, "", &["cinismo"]),
];

const VERB: &[Rule] = &[
    rule("aríamo", 2),
    rule("ássemo", 2),
    rule("eríamo", 2),
    rule("êssemo", 2),
    rule("iríamo", 3),
    rule("íssemo", 3),
    rule("áramo", 2),
    rule("árei", 2),
    rule("aremo", 2),
    rule("ariam", 2),
    rule("aríei", 2),
    rule("ássei", 2),
    rule("assem", 2),
    rule("ávamo", 2),
    rule("êramo", 3),
    rule("eremo", 3),
    rule("eriam", 3),
    rule("eríei", 3),
    rule("êssei", 3),
    rule("essem", 3),
    rule("íramo", 3),
    rule("iremo", 3),
    rule("iriam", 3),
    rule("iríei", 3),
    rule("íssei", 3),
    rule("issem", 3),
    rule("ando", 2),
    rule("endo", 3),
    rule("indo", 3),
    rule("ondo", 3),
    rule("aram", 2),
    rule("arão", 2),
    rule("arde", 2),
    rule("arei", 2),
    rule("arem", 2),
    rule("aria", 2),
    rule("armo", 2),
    rule("asse", 2),
    rule("aste", 2),
    except("avam", 2, "", &["agravam"]),
    rule("ávei", 2),
    rule("eram", 3),
    rule("erão", 3),
    rule("erde", 3),
    rule("erei", 3),
    rule("êrei", 3),
    rule("erem", 3),
    rule("eria", 3),
    rule("ermo", 3),
    rule("esse", 3),
    except("este", 3, "", &["faroeste", "agreste"]),
    rule("íamo", 3),
    rule("iram", 3),
    rule("íram", 3),
    rule("irão", 2),
    rule("irde", 2),
    except("irei", 3, "", &["admirei"]),
    except("irem", 3, "", &["adquirem"]),
    rule("iria", 3),
    rule("irmo", 3),
    rule("isse", 3),
    rule("iste", 4),
    except("iava", 4, "", &["ampliava"]),
    rule("amo", 2),
    rule("iona", 3),
    except("ara", 2, "", &["arara", "prepara"]),
    except("ará", 2, "", &["alvará"]),
    except("are", 2, "", &["prepare"]),
    except("ava", 2, "", &["agrava"]),
    rule("emo", 2),
    except("era", 3, "", &["acelera", "espera"]),
    rule("erá", 3),
    except("ere", 3, "", &["espere"]),
    except("iam", 3, "", &["enfiam", "ampliam", "elogiam", "ensaiam"]),
    rule("íei", 3),
    except("imo", 3, "", &["reprimo", "intimo", "íntimo", "nimo", "queimo", "ximo"]),
    except("ira", 3, "", &["fronteira", "sátira"]),
    rule("ído", 3),
    rule("irá", 3),
    except("tizar", 4, "", &["alfabetizar"]),
    except("izar", 5, "", &["organizar"]),
    except("itar", 5, "", &["acreditar", "explicitar", "estreitar"]),
    except("ire", 3, "", &["adquire"]),
    rule("omo", 3),
    rule("ai", 2),
    except("ear", 4, "", &["alardear", "nuclear"]),
    except("ar", 2, "", &["azar", "bazaar", "patamar"]),
    rule("uei", 3),
    rewrite("uía", 5, "u"),
    rule("ei", 3),
    rewrite("guem", 3, "g"),
    except("em", 2, "", &["alem", "virgem"]),
    except("er", 2, "", &["éter", "pier"]),
    except("eu", 3, "", &["chapeu"]),
    except(
        "ia",
        3,
        "",
        &["estória", "fatia", "acia", "praia", "elogia", "mania", "lábia", "aprecia", "polícia", "arredia", "cheia", "ásia"],
    ),
    except("ir", 3, "", &["freir"]),
    rule("iu", 3),
    rule("eou", 5),
    rule("ou", 3),
];

const VOWEL: &[Rule] = &[
    rewrite("bil", 2, "vel"),
    except("gue", 2, "g", &["gangue", "jegue"]),
    rule("á", 3),
    except("ê", 3, "", &["bebê"]),
    except("a", 3, "", &["ásia"]),
    rule("e", 3),
    except("o", 3, "", &["ão"]),
];

const ALL_STEPS: [&[Rule]; 7] = [PLURAL, FEMININE, ADVERB, AUGMENTATIVE, NOUN, VERB, VOWEL];

/// Reduce a lowercased Portuguese word to its accent-free stem.
pub fn stem(word: &str) -> String {
    let mut word = word.to_string();

    if word.ends_with('s') {
        apply_step(&mut word, PLURAL);
    }
    if word.ends_with('a') || word.ends_with('ã') {
        apply_step(&mut word, FEMININE);
    }
    apply_step(&mut word, ADVERB);
    apply_step(&mut word, AUGMENTATIVE);
    if !apply_step(&mut word, NOUN) && !apply_step(&mut word, VERB) {
        apply_step(&mut word, VOWEL);
    }

    fold_diacritics(&word)
}

/// Apply the first matching rule of a step. Returns whether the word changed.
fn apply_step(word: &mut String, rules: &[Rule]) -> bool {
    for rule in rules {
        let Some(stem) = word.strip_suffix(rule.suffix) else {
            continue;
        };
        if stem.chars().count() < rule.min_stem || rule.exceptions.contains(&word.as_str()) {
            continue;
        }

        let mut reduced = String::with_capacity(stem.len() + rule.replacement.len());
        reduced.push_str(stem);
        reduced.push_str(rule.replacement);
        *word = reduced;
        return true;
    }
    false
}

/// Strip combining marks after canonical decomposition (`ç` → `c`, `ã` → `a`).
pub fn fold_diacritics(word: &str) -> String {
    word.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Validate the rule tables and run a known reduction.
///
/// Used once at startup to decide whether the linguistic normalizer tier can
/// be trusted.
pub(crate) fn self_check() -> bool {
    let tables_valid = ALL_STEPS.iter().all(|rules| {
        !rules.is_empty()
            && rules.iter().all(|r| {
                !r.suffix.is_empty() && r.suffix.chars().all(|c| c.is_lowercase())
            })
    });

    tables_valid && stem("reuniões") == "reuni"
}
