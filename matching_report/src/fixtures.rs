// In-memory reference tables and responses shared by the unit tests.

use crate::config::*;
use crate::lookup::References;
use crate::table::ResponseTable;

fn q(step: &str, nl: &str, en: &str) -> PdefQuestion {
    PdefQuestion {
        step: step.to_string(),
        text: Localized::new(nl, en),
        system_list: None,
    }
}

fn q_list(step: &str, nl: &str, en: &str, list: &str) -> PdefQuestion {
    PdefQuestion {
        system_list: Some(list.to_string()),
        ..q(step, nl, en)
    }
}

fn a(step: &str, code: &str, nl: &str, en: &str) -> PdefAnswer {
    PdefAnswer {
        step: step.to_string(),
        code: code.to_string(),
        text: Localized::new(nl, en),
    }
}

fn c(code: &str, group: &str, kind: CodingKind, nl: &str, en: &str) -> Coding {
    Coding {
        code: code.to_string(),
        group: group.to_string(),
        kind,
        text: Localized::new(nl, en),
    }
}

pub(crate) fn sample_references() -> References {
    use CodingKind::{Answer, Question};
    References {
        questions: vec![
            q("O_DATUM_MATCHING", "Datum matching", "Matching date"),
            q(
                "U_EERSTEKEUZE",
                "Is deze opleiding je eerste keuze?",
                "Is this programme your first choice?",
            ),
            q("U_PROFIEL", "Profiel", "Profile"),
            q("U_DIPLOMA_BEH", "Behaalde vooropleiding", "Pre-education obtained"),
            q("U_HBO_TOEGANG", "Toegang via", "Access via"),
            q(
                "U_ACTIV_MIDDEL",
                "Welke middelen heb je gebruikt?",
                "Which tools did you use?",
            ),
            q(
                "U_FACTOREN",
                "Welke factoren speelden een rol?",
                "Which factors played a role?",
            ),
            q(
                "O_BEROEP",
                "Welke beroepen overweeg je?",
                "Which professions do you consider?",
            ),
            q(
                "O_SCHOOLWK_TOE",
                "Hoeveel uur besteed je aan school?",
                "How many hours do you spend on school?",
            ),
            q(
                "U_STUDIEWK_TOEL",
                "Hoeveel uur verwacht je te studeren?",
                "How many hours do you expect to study?",
            ),
            q(
                "U_STELLING_TOEL",
                "Geef aan in hoeverre de stellingen op je van toepassing zijn",
                "Indicate to what extent the statements apply to you",
            ),
            q("O_STELLING_TOEL", "Stellingen (eens)", "Statements (agree)"),
            q("O_STELLING_TOE2", "Stellingen (past)", "Statements (fit)"),
            q_list(
                "O_STELLING_1",
                "Ik lees graag",
                "I like reading",
                "AANM_5PUNTS",
            ),
            q_list(
                "O_STELLING_2",
                "Deze studie past bij mij",
                "This programme suits me",
                "AANM_5PUNTS_B",
            ),
            q("O_CIJF_WISK", "Cijfer wiskunde", "Grade mathematics"),
            q("U_CIJF_ENGELS", "Cijfer Engels", "Grade English"),
            q("U_CIJF_TOEL3", "Vul je havo-cijfers in", "Enter your havo grades"),
            q("O_CIJF_TOEL4", "Vul je vwo-cijfers in", "Enter your vwo grades"),
            q(
                "U_INTERESSE_HON",
                "Heb je interesse in honours?",
                "Are you interested in honours?",
            ),
        ],
        answers: vec![
            a("U_EERSTEKEUZE", "JA", "ja", "yes"),
            a("U_EERSTEKEUZE", "NEE", "nee", "no"),
            a("U_PROFIEL", "NT", "natuur en techniek", "nature and technology"),
            a("U_PROFIEL", "NG", "natuur en gezondheid", "nature and health"),
            a("U_PROFIEL", "EM", "economie en maatschappij", "economy and society"),
            a("U_PROFIEL", "CM", "cultuur en maatschappij", "culture and society"),
            a("U_DIPLOMA_BEH", "VWO_BEH", "vwo behaald", "vwo obtained"),
            a("U_DIPLOMA_BEH", "VWO_NOG_BEH", "vwo nog niet behaald", "vwo not yet obtained"),
            a("U_DIPLOMA_BEH", "HAVO", "havo", "havo"),
            a("U_HBO_TOEGANG", "HAVO", "havo", "havo"),
            a("U_HBO_TOEGANG", "PROPEDEUSE", "propedeuse", "first-year diploma"),
            a("O_BEROEP", "LERAAR", "leraar", "teacher"),
            a("O_BEROEP", "ONDERZOEKER", "onderzoeker", "researcher"),
            a("U_INTERESSE_HON", "JA", "ja", "yes"),
            a("U_INTERESSE_HON", "NEE", "nee", "no"),
            a("U_INTERESSE_HON", "MISSCHIEN", "misschien", "maybe"),
        ],
        codings: vec![
            c("MIDDEL_OPENDAG", "U_ACTIV_MIDDEL", Question, "open dag", "open day"),
            c("MIDDEL_WEBSITE", "U_ACTIV_MIDDEL", Question, "website", "website"),
            c(
                "W-GEBR-W-GEH",
                "U_ACTIV_MIDDEL",
                Answer,
                "gebruikt, nuttig",
                "used, helpful",
            ),
            c(
                "W-GEBR-N-GEH",
                "U_ACTIV_MIDDEL",
                Answer,
                "gebruikt, niet nuttig",
                "used, not helpful",
            ),
            c("N-GEBR", "U_ACTIV_MIDDEL", Answer, "niet gebruikt", "not used"),
            c("INHOUD", "U_FACTOREN", Question, "inhoud", "content"),
            c("SFEER", "U_FACTOREN", Question, "sfeer", "atmosphere"),
            c("BEROEP", "U_FACTOREN", Question, "beroep", "profession"),
            c("CONSC_1", "U_STEL_CONSC", Question, "Ik ben nauwkeurig", "I am precise"),
            c("CONSC_2", "U_STEL_CONSC", Question, "Ik plan mijn werk", "I plan my work"),
            c("HELEMAAL-EENS", "STELLING_EENS", Answer, "helemaal eens", "strongly agree"),
            c("EENS", "STELLING_EENS", Answer, "eens", "agree"),
            c("NEUTRAAL", "STELLING_EENS", Answer, "neutraal", "neutral"),
            c("ONEENS", "STELLING_EENS", Answer, "oneens", "disagree"),
            c(
                "HELEMAAL-ONEENS",
                "STELLING_EENS",
                Answer,
                "helemaal oneens",
                "strongly disagree",
            ),
            c("PAST-GOED", "STELLING_PAST", Answer, "past goed", "fits well"),
            c("PAST", "STELLING_PAST", Answer, "past", "fits"),
            c("PAST-NIET", "STELLING_PAST", Answer, "past niet", "does not fit"),
            c("O_SCHOOLWK_LES", "O_SCHOOLWK_TOE", Question, "lesuren", "class hours"),
            c("O_SCHOOLWK_HUIS", "O_SCHOOLWK_TOE", Question, "huiswerk", "homework"),
            c("U_STUDIEWK_UUR", "U_STUDIEWK_TOEL", Question, "studie-uren", "study hours"),
        ],
        programmes: vec![
            Programme {
                code: "BIOL".to_string(),
                name: Localized::new("Biologie", "Biology"),
            },
            Programme {
                code: "HISB".to_string(),
                name: Localized::new("Geschiedenis", "History"),
            },
        ],
    }
}

fn r(form: &str, student: &str, programme: &str, step: &str, answer: &str) -> Response {
    Response {
        form_id: form.to_string(),
        student_id: student.to_string(),
        programme: programme.to_string(),
        faculty: None,
        step: step.to_string(),
        answer: Some(answer.to_string()),
    }
}

pub(crate) fn sample_responses() -> ResponseTable {
    ResponseTable::new(vec![
        // F1: vwo, biology, April
        r("F1", "S1", "BIOL", "O_DATUM_MATCHING", "APRIL"),
        r("F1", "S1", "BIOL", "U_EERSTEKEUZE", "JA"),
        r("F1", "S1", "BIOL", "U_PROFIEL", "NT"),
        r("F1", "S1", "BIOL", "U_DIPLOMA_BEH", "VWO_BEH"),
        r("F1", "S1", "BIOL", "O_CIJF_WISK", "75"),
        r("F1", "S1", "BIOL", "U_CIJF_ENGELS", "8"),
        r("F1", "S1", "BIOL", "U_FACTOREN", "INHOUD|SFEER"),
        r("F1", "S1", "BIOL", "O_SCHOOLWK_LES", "12,5"),
        r("F1", "S1", "BIOL", "O_SCHOOLWK_HUIS", "abc"),
        r("F1", "S1", "BIOL", "MIDDEL_OPENDAG", "W-GEBR-W-GEH"),
        r("F1", "S1", "BIOL", "MIDDEL_WEBSITE", "N-GEBR"),
        r("F1", "S1", "BIOL", "CONSC_1", "EENS"),
        r("F1", "S1", "BIOL", "O_STELLING_1", "EENS"),
        r("F1", "S1", "BIOL", "U_INTERESSE_HON", "JA"),
        r("F1", "S1", "BIOL", "O_BEROEP", "LERAAR"),
        // F2: havo, biology, April
        r("F2", "S2", "BIOL", "O_DATUM_MATCHING", "APRIL"),
        r("F2", "S2", "BIOL", "U_EERSTEKEUZE", "NEE"),
        r("F2", "S2", "BIOL", "U_PROFIEL", "NG"),
        r("F2", "S2", "BIOL", "U_DIPLOMA_BEH", "HAVO"),
        r("F2", "S2", "BIOL", "U_HBO_TOEGANG", "HAVO"),
        r("F2", "S2", "BIOL", "O_CIJF_WISK", "6"),
        r("F2", "S2", "BIOL", "U_CIJF_ENGELS", "105"),
        r("F2", "S2", "BIOL", "U_FACTOREN", "INHOUD"),
        r("F2", "S2", "BIOL", "O_SCHOOLWK_LES", "31"),
        r("F2", "S2", "BIOL", "MIDDEL_OPENDAG", "N-GEBR"),
        r("F2", "S2", "BIOL", "CONSC_1", "HELEMAAL-EENS"),
        r("F2", "S2", "BIOL", "O_BEROEP", "LERAAR|ONDERZOEKER"),
        // F3: vwo, history, June
        r("F3", "S3", "HISB", "O_DATUM_MATCHING", "JUNI"),
        r("F3", "S3", "HISB", "U_EERSTEKEUZE", "JA"),
        r("F3", "S3", "HISB", "U_PROFIEL", "EM"),
        r("F3", "S3", "HISB", "U_DIPLOMA_BEH", "VWO_NOG_BEH"),
        r("F3", "S3", "HISB", "O_CIJF_WISK", "9"),
        // F4: biology, February
        r("F4", "S4", "BIOL", "O_DATUM_MATCHING", "FEBRUARI"),
        r("F4", "S4", "BIOL", "U_EERSTEKEUZE", "JA"),
    ])
}
