//! Built-in phrase dictionary for instant translation without an API call.
//!
//! Two layers: cross-language phrases registered symmetrically over every
//! language pair, and universal gaming abbreviations keyed only by target
//! language. Glossary Tier-1 safe abbreviations back both lookups.

use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::glossary;

type PhraseKey = (String, String, String); // (norm_text, src_lang, tgt_lang)
type AbbrevKey = (String, String); // (norm_text, tgt_lang)

/// Lowercase, trim, strip trailing punctuation (mid-word apostrophes kept).
fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .trim_end_matches(|c| "!?.,:;\"'()".contains(c))
        .to_string()
}

/// Register a phrase across all language pair combinations.
fn add(entries: &mut HashMap<PhraseKey, &'static str>, phrase: &[(&str, &'static str)]) {
    for (i, (src_lang, src_text)) in phrase.iter().enumerate() {
        for (j, (tgt_lang, tgt_text)) in phrase.iter().enumerate() {
            if i != j {
                entries.insert(
                    (normalize(src_text), src_lang.to_string(), tgt_lang.to_string()),
                    tgt_text,
                );
            }
        }
    }
}

/// Register a universal gaming abbreviation.
fn abbrev(
    entries: &mut HashMap<AbbrevKey, &'static str>,
    abbr: &str,
    translations: &[(&str, &'static str)],
) {
    let norm = normalize(abbr);
    for (lang, text) in translations {
        entries.insert((norm.clone(), lang.to_string()), text);
    }
}

#[rustfmt::skip]
static ENTRIES: Lazy<HashMap<PhraseKey, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    // Greetings
    add(&mut m, &[("EN", "hello"), ("RU", "привет"), ("DE", "hallo"), ("FR", "bonjour"), ("ES", "hola")]);
    add(&mut m, &[("EN", "hey"), ("RU", "привет"), ("DE", "hey"), ("FR", "salut"), ("ES", "hey")]);
    add(&mut m, &[("EN", "good morning"), ("RU", "доброе утро"), ("DE", "guten morgen"), ("FR", "bonjour"), ("ES", "buenos días")]);
    add(&mut m, &[("EN", "good evening"), ("RU", "добрый вечер"), ("DE", "guten abend"), ("FR", "bonsoir"), ("ES", "buenas tardes")]);
    add(&mut m, &[("EN", "good night"), ("RU", "спокойной ночи"), ("DE", "gute nacht"), ("FR", "bonne nuit"), ("ES", "buenas noches")]);
    add(&mut m, &[("EN", "bye"), ("RU", "пока"), ("DE", "tschüss"), ("FR", "salut"), ("ES", "adiós")]);
    add(&mut m, &[("EN", "goodbye"), ("RU", "до свидания"), ("DE", "auf wiedersehen"), ("FR", "au revoir"), ("ES", "adiós")]);
    add(&mut m, &[("EN", "see you"), ("RU", "увидимся"), ("DE", "bis dann"), ("FR", "à plus"), ("ES", "nos vemos")]);
    add(&mut m, &[("EN", "cya"), ("RU", "пока"), ("DE", "cya"), ("FR", "a+"), ("ES", "nos vemos")]);
    add(&mut m, &[("EN", "later"), ("RU", "позже"), ("DE", "später"), ("FR", "à plus tard"), ("ES", "luego")]);
    add(&mut m, &[("EN", "welcome"), ("RU", "добро пожаловать"), ("DE", "willkommen"), ("FR", "bienvenue"), ("ES", "bienvenido")]);

    // Politeness
    add(&mut m, &[("EN", "thanks"), ("RU", "спасибо"), ("DE", "danke"), ("FR", "merci"), ("ES", "gracias")]);
    add(&mut m, &[("EN", "thank you"), ("RU", "спасибо"), ("DE", "danke schön"), ("FR", "merci"), ("ES", "gracias")]);
    add(&mut m, &[("EN", "thx"), ("RU", "спасибо"), ("DE", "danke"), ("FR", "merci"), ("ES", "gracias")]);
    add(&mut m, &[("EN", "please"), ("RU", "пожалуйста"), ("DE", "bitte"), ("FR", "s'il vous plaît"), ("ES", "por favor")]);
    add(&mut m, &[("EN", "pls"), ("RU", "пожалуйста"), ("DE", "bitte"), ("FR", "svp"), ("ES", "por favor")]);
    add(&mut m, &[("EN", "sorry"), ("RU", "извини"), ("DE", "sorry"), ("FR", "désolé"), ("ES", "perdón")]);
    add(&mut m, &[("EN", "no problem"), ("RU", "без проблем"), ("DE", "kein problem"), ("FR", "pas de problème"), ("ES", "no hay problema")]);
    add(&mut m, &[("EN", "you're welcome"), ("RU", "пожалуйста"), ("DE", "bitte schön"), ("FR", "de rien"), ("ES", "de nada")]);
    add(&mut m, &[("EN", "my bad"), ("RU", "моя ошибка"), ("DE", "mein fehler"), ("FR", "ma faute"), ("ES", "mi culpa")]);

    // Gaming coordination
    add(&mut m, &[("EN", "ready"), ("RU", "готов"), ("DE", "bereit"), ("FR", "prêt"), ("ES", "listo")]);
    add(&mut m, &[("EN", "wait"), ("RU", "подожди"), ("DE", "warte"), ("FR", "attends"), ("ES", "espera")]);
    add(&mut m, &[("EN", "stop"), ("RU", "стоп"), ("DE", "stopp"), ("FR", "stop"), ("ES", "para")]);
    add(&mut m, &[("EN", "help"), ("RU", "помогите"), ("DE", "hilfe"), ("FR", "aide"), ("ES", "ayuda")]);
    add(&mut m, &[("EN", "follow me"), ("RU", "за мной"), ("DE", "folgt mir"), ("FR", "suivez-moi"), ("ES", "síganme")]);
    add(&mut m, &[("EN", "on my way"), ("RU", "иду"), ("DE", "bin unterwegs"), ("FR", "j'arrive"), ("ES", "voy")]);
    add(&mut m, &[("EN", "need help"), ("RU", "нужна помощь"), ("DE", "brauche hilfe"), ("FR", "besoin d'aide"), ("ES", "necesito ayuda")]);
    add(&mut m, &[("EN", "come here"), ("RU", "иди сюда"), ("DE", "komm her"), ("FR", "viens ici"), ("ES", "ven aquí")]);
    add(&mut m, &[("EN", "let's go"), ("RU", "погнали"), ("DE", "los geht's"), ("FR", "allons-y"), ("ES", "vamos")]);
    add(&mut m, &[("EN", "run"), ("RU", "бегите"), ("DE", "lauf"), ("FR", "courez"), ("ES", "corran")]);

    // Status
    add(&mut m, &[("EN", "i'm ready"), ("RU", "я готов"), ("DE", "ich bin bereit"), ("FR", "je suis prêt"), ("ES", "estoy listo")]);
    add(&mut m, &[("EN", "i'm coming"), ("RU", "иду"), ("DE", "ich komme"), ("FR", "j'arrive"), ("ES", "ya voy")]);
    add(&mut m, &[("EN", "one moment"), ("RU", "секунду"), ("DE", "einen moment"), ("FR", "un moment"), ("ES", "un momento")]);
    add(&mut m, &[("EN", "one sec"), ("RU", "секунду"), ("DE", "eine sekunde"), ("FR", "une seconde"), ("ES", "un segundo")]);
    add(&mut m, &[("EN", "back"), ("RU", "вернулся"), ("DE", "zurück"), ("FR", "de retour"), ("ES", "volví")]);
    add(&mut m, &[("EN", "i'm back"), ("RU", "я вернулся"), ("DE", "bin zurück"), ("FR", "je suis de retour"), ("ES", "ya volví")]);

    // Reactions
    add(&mut m, &[("EN", "nice"), ("RU", "круто"), ("DE", "nice"), ("FR", "cool"), ("ES", "genial")]);
    add(&mut m, &[("EN", "great"), ("RU", "отлично"), ("DE", "super"), ("FR", "génial"), ("ES", "genial")]);
    add(&mut m, &[("EN", "cool"), ("RU", "круто"), ("DE", "cool"), ("FR", "cool"), ("ES", "genial")]);
    add(&mut m, &[("EN", "awesome"), ("RU", "круто"), ("DE", "super"), ("FR", "génial"), ("ES", "increíble")]);
    add(&mut m, &[("EN", "well done"), ("RU", "молодец"), ("DE", "gut gemacht"), ("FR", "bien joué"), ("ES", "bien hecho")]);
    add(&mut m, &[("EN", "good job"), ("RU", "молодец"), ("DE", "gute arbeit"), ("FR", "bon travail"), ("ES", "buen trabajo")]);

    // Common questions
    add(&mut m, &[("EN", "how are you"), ("RU", "как дела"), ("DE", "wie geht's"), ("FR", "comment ça va"), ("ES", "cómo estás")]);
    add(&mut m, &[("EN", "where are you"), ("RU", "где ты"), ("DE", "wo bist du"), ("FR", "où es-tu"), ("ES", "dónde estás")]);
    add(&mut m, &[("EN", "what's up"), ("RU", "как дела"), ("DE", "was geht"), ("FR", "quoi de neuf"), ("ES", "qué tal")]);
    add(&mut m, &[("EN", "do you speak english"), ("RU", "ты говоришь по-английски"), ("DE", "sprichst du englisch"), ("FR", "tu parles anglais"), ("ES", "hablas inglés")]);

    // WoW-specific
    add(&mut m, &[("EN", "summon please"), ("RU", "призовите пожалуйста"), ("DE", "summon bitte"), ("FR", "invocation svp"), ("ES", "invocar por favor")]);
    add(&mut m, &[("EN", "invite please"), ("RU", "инвайт пожалуйста"), ("DE", "einladung bitte"), ("FR", "invite svp"), ("ES", "invitar por favor")]);
    add(&mut m, &[("EN", "good run"), ("RU", "хороший ран"), ("DE", "guter run"), ("FR", "bon run"), ("ES", "buen run")]);
    add(&mut m, &[("EN", "good group"), ("RU", "хорошая группа"), ("DE", "gute gruppe"), ("FR", "bon groupe"), ("ES", "buen grupo")]);
    add(&mut m, &[("EN", "good luck"), ("RU", "удачи"), ("DE", "viel glück"), ("FR", "bonne chance"), ("ES", "buena suerte")]);
    add(&mut m, &[("EN", "have fun"), ("RU", "удачи"), ("DE", "viel spaß"), ("FR", "amusez-vous"), ("ES", "diviértanse")]);
    add(&mut m, &[("EN", "well played"), ("RU", "хорошо сыграно"), ("DE", "gut gespielt"), ("FR", "bien joué"), ("ES", "bien jugado")]);

    m
});

#[rustfmt::skip]
static ABBREVIATIONS: Lazy<HashMap<AbbrevKey, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    add_abbrevs(&mut m);
    m
});

#[rustfmt::skip]
fn add_abbrevs(m: &mut HashMap<AbbrevKey, &'static str>) {
    abbrev(m, "gg", &[("RU", "хорошая игра"), ("DE", "gutes Spiel"), ("FR", "bien joué"), ("ES", "buen juego")]);
    abbrev(m, "bb", &[("RU", "пока"), ("EN", "bye bye"), ("DE", "tschüss"), ("FR", "salut"), ("ES", "adiós")]);
    abbrev(m, "afk", &[("RU", "отошёл"), ("DE", "bin weg"), ("FR", "absent"), ("ES", "ausente")]);
    abbrev(m, "brb", &[("RU", "скоро вернусь"), ("DE", "bin gleich zurück"), ("FR", "je reviens"), ("ES", "ya vuelvo")]);
    abbrev(m, "ty", &[("RU", "спасибо"), ("DE", "danke"), ("FR", "merci"), ("ES", "gracias")]);
    abbrev(m, "np", &[("RU", "без проблем"), ("DE", "kein Problem"), ("FR", "pas de problème"), ("ES", "no hay problema")]);
    abbrev(m, "wp", &[("RU", "хорошо сыграно"), ("DE", "gut gespielt"), ("FR", "bien joué"), ("ES", "bien jugado")]);
    abbrev(m, "gj", &[("RU", "молодец"), ("DE", "gute Arbeit"), ("FR", "bon travail"), ("ES", "buen trabajo")]);
    abbrev(m, "gl", &[("RU", "удачи"), ("DE", "viel Glück"), ("FR", "bonne chance"), ("ES", "buena suerte")]);
    abbrev(m, "hf", &[("RU", "удачи"), ("DE", "viel Spaß"), ("FR", "amusez-vous"), ("ES", "diviértanse")]);
    abbrev(m, "omw", &[("RU", "иду"), ("DE", "bin unterwegs"), ("FR", "j'arrive"), ("ES", "voy")]);
    abbrev(m, "oom", &[("RU", "нет маны"), ("DE", "kein Mana"), ("FR", "plus de mana"), ("ES", "sin maná")]);
    abbrev(m, "lfg", &[("RU", "ищу группу"), ("DE", "suche Gruppe"), ("FR", "cherche groupe"), ("ES", "busco grupo")]);
    abbrev(m, "lfm", &[("RU", "ищу людей"), ("DE", "suche Mitglieder"), ("FR", "cherche joueurs"), ("ES", "busco miembros")]);
    abbrev(m, "inv", &[("RU", "инвайт"), ("DE", "Einladung"), ("FR", "invite"), ("ES", "invitar")]);
    abbrev(m, "rdy", &[("RU", "готов"), ("DE", "bereit"), ("FR", "prêt"), ("ES", "listo")]);
    abbrev(m, "inc", &[("RU", "идут на нас"), ("DE", "Feind kommt"), ("FR", "ennemi arrive"), ("ES", "enemigo viene")]);
    abbrev(m, "wts", &[("RU", "продам"), ("DE", "verkaufe"), ("FR", "vends"), ("ES", "vendo")]);
    abbrev(m, "wtb", &[("RU", "куплю"), ("DE", "kaufe"), ("FR", "achète"), ("ES", "compro")]);
    abbrev(m, "mb", &[("RU", "моя ошибка"), ("DE", "mein Fehler"), ("FR", "ma faute"), ("ES", "mi culpa")]);
    abbrev(m, "idd", &[("RU", "инстанс"), ("DE", "Instanz"), ("FR", "instance"), ("ES", "instancia")]);
    abbrev(m, "lf", &[("RU", "ищу"), ("DE", "suche"), ("FR", "cherche"), ("ES", "busco")]);
    abbrev(m, "pls", &[("RU", "пожалуйста"), ("DE", "bitte"), ("FR", "svp"), ("ES", "por favor")]);
    abbrev(m, "thx", &[("RU", "спасибо"), ("DE", "danke"), ("FR", "merci"), ("ES", "gracias")]);
    // Courtesy words every client shortens; kept here so they resolve before
    // the detector gets a chance to call them the user's own language.
    abbrev(m, "thanks", &[("RU", "спасибо"), ("DE", "danke"), ("FR", "merci"), ("ES", "gracias")]);
    abbrev(m, "ty all", &[("RU", "всем спасибо"), ("DE", "danke euch"), ("FR", "merci à tous"), ("ES", "gracias a todos")]);
    abbrev(m, "nvm", &[("RU", "неважно"), ("DE", "egal"), ("FR", "pas grave"), ("ES", "no importa")]);
    abbrev(m, "idk", &[("RU", "не знаю"), ("DE", "weiß nicht"), ("FR", "je sais pas"), ("ES", "no sé")]);
    abbrev(m, "imo", &[("RU", "по-моему"), ("DE", "meiner Meinung nach"), ("FR", "à mon avis"), ("ES", "en mi opinión")]);
    abbrev(m, "tbh", &[("RU", "честно говоря"), ("DE", "ehrlich gesagt"), ("FR", "honnêtement"), ("ES", "la verdad")]);
    abbrev(m, "btw", &[("RU", "кстати"), ("DE", "übrigens"), ("FR", "au fait"), ("ES", "por cierto")]);
    abbrev(m, "gtg", &[("RU", "мне пора"), ("DE", "muss los"), ("FR", "je dois y aller"), ("ES", "me tengo que ir")]);
    abbrev(m, "nw", &[("RU", "без проблем"), ("DE", "kein Problem"), ("FR", "pas de souci"), ("ES", "no hay problema")]);

    // Common short words (too short for the detector or commonly misdetected)
    abbrev(m, "yes", &[("RU", "да"), ("DE", "ja"), ("FR", "oui"), ("ES", "sí")]);
    abbrev(m, "yea", &[("RU", "да"), ("DE", "ja"), ("FR", "ouais"), ("ES", "sí")]);
    abbrev(m, "yeah", &[("RU", "да"), ("DE", "ja"), ("FR", "ouais"), ("ES", "sí")]);
    abbrev(m, "yep", &[("RU", "да"), ("DE", "jap"), ("FR", "ouais"), ("ES", "sip")]);
    abbrev(m, "no", &[("RU", "нет"), ("DE", "nein"), ("FR", "non"), ("ES", "no")]);
    abbrev(m, "nope", &[("RU", "неа"), ("DE", "nö"), ("FR", "nan"), ("ES", "nel")]);

    // Summon requests ("123" = "summon me" by convention)
    abbrev(m, "123", &[("RU", "саммон"), ("EN", "summon"), ("DE", "Beschwörung"), ("FR", "invocation"), ("ES", "invocar")]);
    abbrev(m, "123 pls", &[("RU", "саммон пожалуйста"), ("EN", "summon please"), ("DE", "Beschwörung bitte"), ("FR", "invocation svp"), ("ES", "invocar por favor")]);
    abbrev(m, "sum pls", &[("RU", "саммон пожалуйста"), ("EN", "summon please"), ("DE", "Beschwörung bitte"), ("FR", "invocation svp"), ("ES", "invocar por favor")]);
    abbrev(m, "sum", &[("RU", "саммон"), ("EN", "summon"), ("DE", "Beschwörung"), ("FR", "invocation"), ("ES", "invocar")]);
    abbrev(m, "summ", &[("RU", "саммон"), ("EN", "summon"), ("DE", "Beschwörung"), ("FR", "invocation"), ("ES", "invocar")]);
    abbrev(m, "summ pls", &[("RU", "саммон пожалуйста"), ("EN", "summon please"), ("DE", "Beschwörung bitte"), ("FR", "invocation svp"), ("ES", "invocar por favor")]);
    abbrev(m, "summ all pls", &[("RU", "саммон всех пожалуйста"), ("EN", "summon all please"), ("DE", "alle beschwören bitte"), ("FR", "invocation tous svp"), ("ES", "invocar a todos por favor")]);
    abbrev(m, "sum all pls", &[("RU", "саммон всех пожалуйста"), ("EN", "summon all please"), ("DE", "alle beschwören bitte"), ("FR", "invocation tous svp"), ("ES", "invocar a todos por favor")]);

    // Raid / instance coordination
    abbrev(m, "bio", &[("RU", "перерыв"), ("EN", "bio break"), ("DE", "Bio-Pause"), ("FR", "pause bio"), ("ES", "pausa bio")]);
    abbrev(m, "bio break", &[("RU", "перерыв"), ("EN", "bio break"), ("DE", "Bio-Pause"), ("FR", "pause bio"), ("ES", "pausa bio")]);
    abbrev(m, "sec bio", &[("RU", "секунду, перерыв"), ("EN", "sec, bio break"), ("DE", "Sekunde, Bio-Pause"), ("FR", "seconde, pause bio"), ("ES", "segundo, pausa bio")]);
    abbrev(m, "30 sec bio", &[("RU", "30 секунд перерыв"), ("EN", "30 sec bio break"), ("DE", "30 Sek Bio-Pause"), ("FR", "30 sec pause bio"), ("ES", "30 seg pausa bio")]);
    abbrev(m, "2 min bio", &[("RU", "2 минуты перерыв"), ("EN", "2 min bio break"), ("DE", "2 Min Bio-Pause"), ("FR", "2 min pause bio"), ("ES", "2 min pausa bio")]);
    abbrev(m, "5 min bio", &[("RU", "5 минут перерыв"), ("EN", "5 min bio break"), ("DE", "5 Min Bio-Pause"), ("FR", "5 min pause bio"), ("ES", "5 min pausa bio")]);
    abbrev(m, "on last", &[("RU", "на последнем боссе"), ("EN", "on last boss"), ("DE", "beim letzten Boss"), ("FR", "au dernier boss"), ("ES", "en el último jefe")]);
    abbrev(m, "wipe", &[("RU", "вайп"), ("EN", "wipe"), ("DE", "Wipe"), ("FR", "wipe"), ("ES", "wipe")]);
    abbrev(m, "lust", &[("RU", "героизм"), ("EN", "bloodlust"), ("DE", "Kampfrausch"), ("FR", "furie sanguinaire"), ("ES", "ansia de sangre")]);
    abbrev(m, "bl", &[("RU", "героизм"), ("EN", "bloodlust"), ("DE", "Kampfrausch"), ("FR", "furie sanguinaire"), ("ES", "ansia de sangre")]);
    abbrev(m, "hero", &[("RU", "героизм"), ("EN", "heroism"), ("DE", "Heldentum"), ("FR", "héroïsme"), ("ES", "heroísmo")]);
    abbrev(m, "brez", &[("RU", "боевой рез"), ("EN", "battle rez"), ("DE", "Kampfrez"), ("FR", "rez combat"), ("ES", "rez combate")]);
    abbrev(m, "rez", &[("RU", "воскрешение"), ("EN", "resurrect"), ("DE", "Wiederbelebung"), ("FR", "résurrection"), ("ES", "resurrección")]);
    abbrev(m, "rezz", &[("RU", "воскрешение"), ("EN", "resurrect"), ("DE", "Wiederbelebung"), ("FR", "résurrection"), ("ES", "resurrección")]);
    abbrev(m, "rezz pls", &[("RU", "воскресите пожалуйста"), ("EN", "rez please"), ("DE", "Rez bitte"), ("FR", "rez svp"), ("ES", "rez por favor")]);
    abbrev(m, "rez pls", &[("RU", "воскресите пожалуйста"), ("EN", "rez please"), ("DE", "Rez bitte"), ("FR", "rez svp"), ("ES", "rez por favor")]);
    abbrev(m, "cds", &[("RU", "кулдауны"), ("EN", "cooldowns"), ("DE", "Abklingzeiten"), ("FR", "cooldowns"), ("ES", "cooldowns")]);
    abbrev(m, "pop cds", &[("RU", "юзайте кулдауны"), ("EN", "pop cooldowns"), ("DE", "CDs nutzen"), ("FR", "pop les CDs"), ("ES", "usar CDs")]);
    abbrev(m, "kick", &[("RU", "сбейте каст"), ("EN", "interrupt"), ("DE", "unterbrechen"), ("FR", "interrompre"), ("ES", "interrumpir")]);
    abbrev(m, "int", &[("RU", "сбейте каст"), ("EN", "interrupt"), ("DE", "unterbrechen"), ("FR", "interrompre"), ("ES", "interrumpir")]);
    abbrev(m, "gl guys", &[("RU", "удачи, ребята"), ("EN", "good luck guys"), ("DE", "viel Glück Leute"), ("FR", "bonne chance les gars"), ("ES", "buena suerte chicos")]);
    abbrev(m, "gl all", &[("RU", "всем удачи"), ("EN", "good luck all"), ("DE", "allen viel Glück"), ("FR", "bonne chance à tous"), ("ES", "buena suerte a todos")]);
    abbrev(m, "gl hf", &[("RU", "удачи, весёлой игры"), ("EN", "good luck, have fun"), ("DE", "viel Glück und Spaß"), ("FR", "bonne chance, amusez-vous"), ("ES", "buena suerte, diviértanse")]);
    abbrev(m, "gg wp", &[("RU", "хорошая игра, молодцы"), ("EN", "good game, well played"), ("DE", "gutes Spiel, gut gespielt"), ("FR", "bien joué"), ("ES", "buen juego, bien jugado")]);
    abbrev(m, "gotta go", &[("RU", "мне пора"), ("EN", "gotta go"), ("DE", "muss los"), ("FR", "je dois y aller"), ("ES", "me tengo que ir")]);
    abbrev(m, "zug zug", &[("RU", "зуг зуг (да, сэр)"), ("EN", "zug zug (yes, sir)"), ("DE", "Zug Zug (jawohl)"), ("FR", "zug zug (oui chef)"), ("ES", "zug zug (sí, señor)")]);
    abbrev(m, "zamn", &[("RU", "ого"), ("EN", "damn"), ("DE", "verdammt"), ("FR", "la vache"), ("ES", "caramba")]);
}

/// Look up a phrase in the built-in phrasebook.
///
/// Checks language-specific phrases first, then universal abbreviations,
/// then glossary Tier-1 safe abbreviations. Returns None on miss.
pub fn lookup(text: &str, source_lang: &str, target_lang: &str) -> Option<&'static str> {
    let norm = normalize(text);
    let src = source_lang.to_uppercase();
    let tgt = target_lang.to_uppercase();

    if let Some(&result) = ENTRIES.get(&(norm.clone(), src, tgt.clone())) {
        debug!(
            "Phrasebook hit: {:?} [{}->{}] = {:?}",
            text, source_lang, target_lang, result
        );
        return Some(result);
    }

    if let Some(&result) = ABBREVIATIONS.get(&(norm.clone(), tgt.clone())) {
        debug!("Abbreviation hit: {:?} [->{}] = {:?}", text, target_lang, result);
        return Some(result);
    }

    glossary::lookup_abbreviation(&norm, &tgt)
}

/// Look up a universal abbreviation (no source language needed).
///
/// Used for pre-detection lookup of short gaming abbreviations that are
/// identical across all languages.
pub fn lookup_abbreviation(text: &str, target_lang: &str) -> Option<&'static str> {
    let norm = normalize(text);
    let tgt = target_lang.to_uppercase();

    if let Some(&result) = ABBREVIATIONS.get(&(norm.clone(), tgt.clone())) {
        debug!(
            "Abbreviation pre-detect: {:?} [->{}] = {:?}",
            text, target_lang, result
        );
        return Some(result);
    }

    glossary::lookup_abbreviation(&norm, &tgt)
}
