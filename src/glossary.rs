//! WoW glossary: abbreviation lookup + context-gated term expansion.
//!
//! Tier 1: unambiguous gaming abbreviations safe to translate standalone.
//! Tier 2: WoW-specific terms expanded to plain English before the MT call,
//! gated on at least two recognized terms co-occurring in the message.

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Words that must never be expanded even if they appear in the expansion
/// table: they have common non-gaming meanings that would corrupt normal
/// sentences.
static NEVER_EXPAND: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "add", "hit", "focus", "fire", "arms", "fury", "balance", "shadow",
        "holy", "blood", "sub", "cap", "need", "link", "gear", "spirit",
        "dodge", "trap", "burst", "stun", "recruit", "officer", "fresh",
        "mining", "cooking", "fishing", "frost", "arcane", "beast",
        "guardian", "resto", "disc", "brew", "wind", "mist", "dev",
        "survival", "mark", "warden", "assa", "haven",
    ]
    .into_iter()
    .collect()
});

/// Minimum number of recognized WoW terms in a message to trigger expansion.
const CONTEXT_GATE: usize = 2;

// Tier 1: safe standalone abbreviations with per-language translations.
#[rustfmt::skip]
static SAFE_ABBREVIATIONS: &[(&str, &[(&str, &str)])] = &[
    // Social
    ("gz",     &[("EN", "congratulations"), ("RU", "поздравляю"), ("DE", "Glückwunsch"), ("FR", "félicitations"), ("ES", "felicidades")]),
    ("gratz",  &[("EN", "congratulations"), ("RU", "поздравляю"), ("DE", "Glückwunsch"), ("FR", "félicitations"), ("ES", "felicidades")]),
    ("grats",  &[("EN", "congratulations"), ("RU", "поздравляю"), ("DE", "Glückwunsch"), ("FR", "félicitations"), ("ES", "felicidades")]),
    ("ggwp",   &[("EN", "good game, well played"), ("RU", "хорошая игра, молодцы"), ("DE", "gutes Spiel, gut gespielt")]),
    ("glhf",   &[("EN", "good luck, have fun"), ("RU", "удачи и весёлой игры"), ("DE", "viel Glück und Spaß")]),
    ("g2g",    &[("EN", "got to go"), ("RU", "мне пора"), ("DE", "muss los"), ("FR", "je dois y aller")]),
    ("gn",     &[("EN", "good night"), ("RU", "спокойной ночи"), ("DE", "gute Nacht"), ("FR", "bonne nuit"), ("ES", "buenas noches")]),
    ("wb",     &[("EN", "welcome back"), ("RU", "с возвращением"), ("DE", "willkommen zurück"), ("FR", "re"), ("ES", "bienvenido de vuelta")]),
    ("dc",     &[("EN", "disconnected"), ("RU", "вылетел из игры"), ("DE", "Verbindung verloren"), ("FR", "déconnecté"), ("ES", "desconectado")]),
    ("omfg",   &[("EN", "oh my god"), ("RU", "боже мой"), ("DE", "oh mein Gott")]),
    ("rofl",   &[("EN", "laughing out loud"), ("RU", "очень смешно"), ("DE", "lache laut")]),
    ("ninja",  &[("EN", "loot thief"), ("RU", "нинзя (ворует добычу)"), ("DE", "Beuteklauer")]),
    // Classes and specs
    ("pala",    &[("EN", "paladin"), ("RU", "паладин"), ("DE", "Paladin"), ("FR", "paladin"), ("ES", "paladín")]),
    ("hpala",   &[("EN", "holy paladin"), ("RU", "холи паладин"), ("DE", "Heilig-Paladin")]),
    ("rpala",   &[("EN", "retribution paladin"), ("RU", "ретри паладин")]),
    ("ppala",   &[("EN", "protection paladin"), ("RU", "прот паладин")]),
    ("warr",    &[("EN", "warrior"), ("RU", "воин"), ("DE", "Krieger"), ("FR", "guerrier"), ("ES", "guerrero")]),
    ("dk",      &[("EN", "death knight"), ("RU", "рыцарь смерти"), ("DE", "Todesritter")]),
    ("dh",      &[("EN", "demon hunter"), ("RU", "охотник на демонов"), ("DE", "Dämonenjäger")]),
    ("lock",    &[("EN", "warlock"), ("RU", "чернокнижник"), ("DE", "Hexenmeister"), ("FR", "démoniste")]),
    ("spriest", &[("EN", "shadow priest"), ("RU", "шадоу прист"), ("DE", "Schattenpriester")]),
    ("sham",    &[("EN", "shaman"), ("RU", "шаман"), ("DE", "Schamane"), ("FR", "chaman")]),
    ("rsham",   &[("EN", "restoration shaman"), ("RU", "рестор шаман")]),
    ("esham",   &[("EN", "elemental shaman"), ("RU", "элем шаман")]),
    ("dudu",    &[("EN", "druid"), ("RU", "друид"), ("DE", "Druide"), ("FR", "druide")]),
    ("rdruid",  &[("EN", "restoration druid"), ("RU", "рестор друид")]),
    ("bdruid",  &[("EN", "balance druid"), ("RU", "баланс друид")]),
    ("fdruid",  &[("EN", "feral druid"), ("RU", "фералка")]),
    ("mage",    &[("EN", "mage"), ("RU", "маг"), ("DE", "Magier"), ("FR", "mage"), ("ES", "mago")]),
    ("hunter",  &[("EN", "hunter"), ("RU", "охотник"), ("DE", "Jäger"), ("FR", "chasseur"), ("ES", "cazador")]),
    ("monk",    &[("EN", "monk"), ("RU", "монах"), ("DE", "Mönch"), ("FR", "moine"), ("ES", "monje")]),
    ("ww",      &[("EN", "windwalker monk"), ("RU", "виндвокер")]),
    ("mw",      &[("EN", "mistweaver monk"), ("RU", "мистивер")]),
    ("bm",      &[("EN", "beast mastery hunter"), ("RU", "бм охотник")]),
    // Combat
    ("aoe",    &[("EN", "area damage"), ("RU", "урон по области"), ("DE", "Flächenschaden"), ("FR", "dégâts de zone")]),
    ("gcd",    &[("EN", "global cooldown"), ("RU", "глобальный кулдаун")]),
    ("dot",    &[("EN", "damage over time"), ("RU", "периодический урон")]),
    ("hot",    &[("EN", "heal over time"), ("RU", "периодическое лечение")]),
    ("hps",    &[("EN", "healing per second"), ("RU", "лечение в секунду")]),
    ("debuff", &[("EN", "negative effect"), ("RU", "отрицательный эффект"), ("DE", "Schwächungseffekt")]),
    // Group finding
    ("lfr",   &[("EN", "looking for raid"), ("RU", "ищу рейд")]),
    ("lf1m",  &[("EN", "looking for one more"), ("RU", "нужен ещё один")]),
    ("lf2m",  &[("EN", "looking for two more"), ("RU", "нужно ещё двое")]),
    ("lf3m",  &[("EN", "looking for three more"), ("RU", "нужно ещё трое")]),
    ("hc",    &[("EN", "heroic difficulty"), ("RU", "героический режим"), ("DE", "heroischer Modus")]),
    ("nm",    &[("EN", "normal difficulty"), ("RU", "обычный режим")]),
    ("10m",   &[("EN", "10-player raid"), ("RU", "рейд на 10 человек")]),
    ("25m",   &[("EN", "25-player raid"), ("RU", "рейд на 25 человек")]),
    ("ilvl",  &[("EN", "item level"), ("RU", "уровень предметов"), ("DE", "Gegenstandsstufe")]),
    ("achiev", &[("EN", "achievement"), ("RU", "достижение"), ("DE", "Erfolg")]),
    ("achv",  &[("EN", "achievement"), ("RU", "достижение")]),
    ("pug",   &[("EN", "pickup group"), ("RU", "случайная группа")]),
    ("gdkp",  &[("EN", "gold bid loot run"), ("RU", "голд-ран (лут за золото)")]),
    // Items and loot
    ("boe",  &[("EN", "bind on equip"), ("RU", "персонализируется при надевании")]),
    ("bop",  &[("EN", "bind on pickup"), ("RU", "персонализируется при получении")]),
    ("ml",   &[("EN", "master looter"), ("RU", "ответственный за добычу")]),
    ("wtt",  &[("EN", "want to trade"), ("RU", "обменяю"), ("DE", "tausche")]),
    ("cod",  &[("EN", "cash on delivery"), ("RU", "наложенный платёж")]),
    ("ms",   &[("EN", "main spec"), ("RU", "основная специализация")]),
    ("os",   &[("EN", "off spec"), ("RU", "второстепенная специализация")]),
    ("mog",  &[("EN", "transmog appearance"), ("RU", "трансмогрификация")]),
    // PvP
    ("rbg", &[("EN", "rated battleground"), ("RU", "рейтинговое поле боя")]),
    ("ab",  &[("EN", "Arathi Basin"), ("RU", "Низина Арати")]),
    ("av",  &[("EN", "Alterac Valley"), ("RU", "Альтеракская долина")]),
    ("wsg", &[("EN", "Warsong Gulch"), ("RU", "Ущелье Песни Войны")]),
    ("2s",  &[("EN", "2v2 arena"), ("RU", "арена 2 на 2")]),
    ("3s",  &[("EN", "3v3 arena"), ("RU", "арена 3 на 3")]),
    ("5s",  &[("EN", "5v5 arena"), ("RU", "арена 5 на 5")]),
    ("pve", &[("EN", "player versus environment"), ("RU", "ПвЕ")]),
    ("pvp", &[("EN", "player versus player"), ("RU", "ПвП")]),
    // Professions
    ("jc",       &[("EN", "jewelcrafting"), ("RU", "ювелирное дело")]),
    ("bs",       &[("EN", "blacksmithing"), ("RU", "кузнечное дело")]),
    ("lw",       &[("EN", "leatherworking"), ("RU", "кожевничество")]),
    ("alch",     &[("EN", "alchemy"), ("RU", "алхимия"), ("DE", "Alchemie")]),
    ("herb",     &[("EN", "herbalism"), ("RU", "травничество")]),
    ("enchant",  &[("EN", "enchantment"), ("RU", "чары"), ("DE", "Verzauberung")]),
    ("tailor",   &[("EN", "tailoring"), ("RU", "портняжное дело")]),
    ("skinning", &[("EN", "skinning"), ("RU", "снятие шкур")]),
    // Roles / stats
    ("healer",  &[("EN", "healer"), ("RU", "лекарь"), ("DE", "Heiler"), ("FR", "soigneur")]),
    ("healers", &[("EN", "healers"), ("RU", "лекари"), ("DE", "Heiler")]),
    ("heals",   &[("EN", "healing"), ("RU", "лечение")]),
    ("tanks",   &[("EN", "tanks"), ("RU", "танки")]),
    ("ap",      &[("EN", "attack power"), ("RU", "сила атаки")]),
    ("haste",   &[("EN", "haste rating"), ("RU", "скорость")]),
    ("mastery", &[("EN", "mastery rating"), ("RU", "искусность")]),
    ("rng",     &[("EN", "random chance"), ("RU", "случайность")]),
];

// Tier 2: WoW-specific terms expanded to plain English before translation.
// Keys are lowercase; values are what the MT provider actually understands.
#[rustfmt::skip]
static CONTEXT_EXPANSIONS: &[(&str, &str)] = &[
    // Roles and group slang
    ("mt", "main tank"),
    ("ot", "off tank"),
    ("bis", "best in slot"),
    ("offspec", "secondary specialization"),
    ("mainspec", "main specialization"),
    ("respec", "change specialization"),
    ("dual", "dual specialization"),
    ("alt", "alternate character"),
    ("main", "main character"),
    ("twink", "leveled alternate character"),
    ("toon", "character"),
    ("lvl", "level"),
    ("lvling", "leveling"),
    ("lvled", "leveled"),
    ("ding", "level up"),
    ("xp", "experience"),
    ("exp", "experience"),
    ("grind", "repetitive farming"),
    ("boost", "carry run"),
    ("carry", "carry through content"),
    ("geared", "well equipped"),
    ("undergeared", "poorly equipped"),
    ("gearcheck", "equipment check"),
    ("gs", "gear score"),
    ("gearscore", "gear score"),
    // Specs
    ("prot", "protection specialization"),
    ("ret", "retribution specialization"),
    ("enh", "enhancement specialization"),
    ("ele", "elemental specialization"),
    ("demo", "demonology specialization"),
    ("destro", "destruction specialization"),
    ("affli", "affliction specialization"),
    ("feral", "feral specialization"),
    ("boomkin", "balance druid"),
    ("moonkin", "balance druid"),
    ("combat", "combat specialization"),
    ("firemage", "fire mage"),
    ("frostmage", "frost mage"),
    // Combat mechanics
    ("aggro", "enemy attention"),
    ("threat", "threat level"),
    ("taunt", "force enemy attention"),
    ("pull", "start the fight"),
    ("bodypull", "accidental pull by proximity"),
    ("chainpull", "pull continuously"),
    ("los", "line of sight"),
    ("kite", "keep the enemy chasing at range"),
    ("cleave", "hit several nearby targets"),
    ("cone", "frontal cone attack"),
    ("stack", "group up close together"),
    ("unstack", "spread apart"),
    ("spread", "spread out"),
    ("soak", "absorb the hit on purpose"),
    ("interrupt", "interrupt the cast"),
    ("silence", "prevent spellcasting"),
    ("purge", "remove enemy buff"),
    ("dispel", "remove magic effect"),
    ("decurse", "remove curse"),
    ("sheep", "polymorph the target"),
    ("poly", "polymorph"),
    ("sap", "incapacitate before combat"),
    ("shackle", "shackle the undead"),
    ("hex", "hex the target"),
    ("fear", "fear effect"),
    ("root", "immobilize effect"),
    ("slow", "movement slow"),
    ("snare", "movement slow"),
    ("knockback", "push away effect"),
    ("enrage", "boss damage increase"),
    ("berserk", "enrage timer"),
    ("rebuff", "reapply buffs"),
    ("precast", "cast before the pull"),
    ("prepot", "use a potion before the pull"),
    ("popped", "activated"),
    ("cooldown", "ability recharge time"),
    ("regen", "resource regeneration"),
    ("drink", "restore mana by drinking"),
    ("innervate", "mana restoration spell"),
    ("battlerez", "combat resurrection"),
    ("soulstone", "warlock self-resurrection"),
    ("ankh", "shaman self-resurrection"),
    ("bubble", "immunity shield"),
    ("iceblock", "mage immunity"),
    ("loh", "lay on hands"),
    ("salv", "blessing of salvation"),
    ("kings", "blessing of kings"),
    ("might", "blessing of might"),
    ("wisdom", "blessing of wisdom"),
    ("fort", "stamina buff"),
    ("motw", "mark of the wild"),
    ("sta", "stamina"),
    ("stam", "stamina"),
    ("agi", "agility"),
    ("str", "strength"),
    ("spellpower", "spell power"),
    ("sp", "spell power"),
    ("mp5", "mana per five seconds"),
    ("crit", "critical strike"),
    ("expertise", "expertise rating"),
    ("armorpen", "armor penetration"),
    ("arp", "armor penetration"),
    ("resil", "resilience"),
    ("defcap", "defense cap"),
    ("hitcap", "hit cap"),
    // Encounter callouts
    ("adds", "extra enemies"),
    ("trash", "non-boss enemies"),
    ("pat", "patrolling enemy"),
    ("patrol", "patrolling enemy"),
    ("skip", "avoid the enemies"),
    ("ress", "resurrect"),
    ("combatrez", "combat resurrection"),
    ("bloodlust", "haste burst ability"),
    ("heroism", "haste burst ability"),
    ("drums", "drums of battle"),
    ("phase", "encounter phase"),
    ("transition", "phase change"),
    ("softenrage", "increasing damage phase"),
    ("hardmode", "hard mode"),
    ("achievrun", "achievement run"),
    ("speedrun", "speed run"),
    ("lastboss", "final boss"),
    ("endboss", "final boss"),
    ("miniboss", "intermediate boss"),
    ("worldboss", "world boss"),
    // Loot
    ("roll", "roll for the item"),
    ("greed", "greed roll"),
    ("disenchant", "break item into materials"),
    ("de", "disenchant"),
    ("shard", "enchanting shard"),
    ("reserved", "item is reserved"),
    ("hr", "hard reserved item"),
    ("sr", "soft reserved item"),
    ("bonus", "bonus roll"),
    ("token", "armor set token"),
    ("tier", "armor set piece"),
    ("offhand", "off-hand item"),
    ("mainhand", "main-hand weapon"),
    ("2h", "two-handed weapon"),
    ("1h", "one-handed weapon"),
    ("legs", "leg armor"),
    ("shoulders", "shoulder armor"),
    ("bracers", "wrist armor"),
    ("belt", "waist armor"),
    ("boots", "foot armor"),
    ("helm", "head armor"),
    ("chestpiece", "chest armor"),
    ("upgrade", "item upgrade"),
    ("sidegrade", "equivalent item"),
    // Economy
    ("ah", "auction house"),
    ("lowball", "undercut offer"),
    ("undercut", "sell cheaper than others"),
    ("flip", "resell for profit"),
    ("mats", "crafting materials"),
    ("crafter", "crafting character"),
    ("porting", "teleporting players"),
    ("portals", "teleport portals"),
    ("water", "conjured water"),
    ("food", "conjured food"),
    ("vendor", "sell to an NPC merchant"),
    ("repair", "repair equipment"),
    ("repairbill", "repair cost"),
    ("respeccost", "respec cost"),
    ("tip", "gratuity payment"),
    ("fee", "service fee"),
    ("deposit", "auction deposit"),
    // Dungeons and raids (WotLK era)
    ("heroic", "heroic difficulty"),
    ("daily", "daily quest"),
    ("weekly", "weekly raid quest"),
    ("questline", "quest chain"),
    ("prequest", "prerequisite quest"),
    ("attunement", "access requirement"),
    ("lockout", "raid save lockout"),
    ("saved", "already saved to the raid"),
    ("unsaved", "not saved to the raid"),
    ("fullclear", "full clear"),
    ("reset", "instance reset"),
    ("summons", "warlock summons"),
    ("summonstone", "meeting stone"),
    ("port", "teleport"),
    ("hearth", "hearthstone teleport"),
    ("hs", "hearthstone"),
    ("naxx", "Naxxramas raid"),
    ("uld", "Ulduar raid"),
    ("ulduar", "Ulduar raid"),
    ("totc", "Trial of the Crusader raid"),
    ("toc", "Trial of the Crusader"),
    ("togc", "Trial of the Grand Crusader"),
    ("icc", "Icecrown Citadel raid"),
    ("rs", "Ruby Sanctum raid"),
    ("os3d", "Obsidian Sanctum with three drakes"),
    ("eoe", "Eye of Eternity raid"),
    ("maly", "Malygos"),
    ("sarth", "Sartharion"),
    ("kt", "Kel'Thuzad"),
    ("lk", "the Lich King"),
    ("arthas", "the Lich King"),
    ("putricide", "Professor Putricide"),
    ("lootship", "gunship battle"),
    ("saurfang", "Deathbringer Saurfang"),
    ("festergut", "Festergut"),
    ("rotface", "Rotface"),
    ("bq", "Blood Queen"),
    ("dreamwalker", "Valithria Dreamwalker"),
    ("sindra", "Sindragosa"),
    ("kara", "Karazhan raid"),
    ("gruul", "Gruul's Lair"),
    ("ssc", "Serpentshrine Cavern"),
    ("zg", "Zul'Gurub"),
    ("za", "Zul'Aman"),
    ("mc", "Molten Core"),
    ("bwl", "Blackwing Lair"),
    ("aq20", "Ruins of Ahn'Qiraj"),
    ("aq40", "Temple of Ahn'Qiraj"),
    ("strat", "Stratholme dungeon"),
    ("scholo", "Scholomance dungeon"),
    ("brd", "Blackrock Depths"),
    ("ubrs", "Upper Blackrock Spire"),
    ("lbrs", "Lower Blackrock Spire"),
    ("utgarde", "Utgarde Keep"),
    ("nexus", "the Nexus dungeon"),
    ("drak", "Drak'Tharon Keep"),
    ("violet", "Violet Hold"),
    ("vh", "Violet Hold"),
    ("gundrak", "Gundrak dungeon"),
    ("hol", "Halls of Lightning"),
    ("hos", "Halls of Stone"),
    ("cos", "Culling of Stratholme"),
    ("oculus", "the Oculus dungeon"),
    ("utp", "Utgarde Pinnacle"),
    ("fos", "Forge of Souls"),
    ("pos", "Pit of Saron"),
    ("hor", "Halls of Reflection"),
    // Cities and travel
    ("org", "Orgrimmar city"),
    ("ogrimmar", "Orgrimmar city"),
    ("sw", "Stormwind city"),
    ("stormwind", "Stormwind city"),
    ("if", "Ironforge city"),
    ("darna", "Darnassus city"),
    ("tb", "Thunder Bluff city"),
    ("uc", "Undercity"),
    ("shat", "Shattrath city"),
    ("dala", "Dalaran city"),
    ("dalaran", "Dalaran city"),
    ("zeppelin", "zeppelin transport"),
    ("gryphon", "flight master"),
    ("fp", "flight point"),
    ("flightpath", "flight path"),
    ("mount", "riding mount"),
    ("epicmount", "epic riding mount"),
    ("flyer", "flying mount"),
    // PvP
    ("bg", "battleground"),
    ("bgs", "battlegrounds"),
    ("premade", "organized group"),
    ("arena", "arena match"),
    ("rating", "arena rating"),
    ("honor", "honor points"),
    ("marks", "battleground marks"),
    ("flag", "battleground flag"),
    ("fc", "flag carrier"),
    ("efc", "enemy flag carrier"),
    ("mid", "middle of the map"),
    ("base", "capture point"),
    ("recap", "recapture the objective"),
    ("def", "defend"),
    ("gy", "graveyard"),
    ("ganked", "killed by surprise"),
    ("gank", "attack by surprise"),
    ("camped", "repeatedly killed on respawn"),
    ("twinked", "over-equipped for the bracket"),
    // Consumables
    ("flask", "persistent stat potion"),
    ("elixir", "stat elixir"),
    ("pot", "potion"),
    ("pots", "potions"),
    ("healthstone", "warlock health item"),
    ("bandage", "first aid bandage"),
    ("buffood", "stat food"),
    ("fishfeast", "group stat food"),
    ("rune", "mana or health rune"),
    ("scroll", "stat scroll"),
    ("sharpening", "weapon sharpening stone"),
    ("wizardoil", "wizard oil"),
    ("manaoil", "mana oil"),
    // Social shorthand
    ("afkbio", "away for a bio break"),
    ("brt", "be right there"),
    ("bbl", "be back later"),
    ("bbs", "be back soon"),
    ("atm", "at the moment"),
    ("asap", "as soon as possible"),
    ("ftw", "for the win"),
    ("ftl", "for the loss"),
    ("imho", "in my humble opinion"),
    ("afaik", "as far as I know"),
    ("iirc", "if I recall correctly"),
    ("ty4g", "thanks for the group"),
    ("t4g", "thanks for the group"),
    ("tyvm", "thank you very much"),
    ("yw", "you are welcome"),
    ("sry", "sorry"),
    ("soz", "sorry"),
    ("kk", "okay"),
    ("re", "back again"),
    ("lulz", "laughs"),
    ("pwned", "utterly defeated"),
    ("owned", "utterly defeated"),
    ("noob", "inexperienced player"),
    ("nub", "inexperienced player"),
    ("leet", "highly skilled"),
    ("pro", "skilled player"),
    ("casual", "casual player"),
    ("hardcore", "dedicated player"),
    ("guildie", "guild member"),
    ("gm", "guild master"),
    ("officerchat", "officer channel"),
    ("gchat", "guild chat"),
    ("gbank", "guild bank"),
    ("ginvite", "guild invitation"),
    ("gkick", "removal from the guild"),
    ("apply", "apply to the guild"),
    ("trial", "trial member"),
];

static SAFE_LOOKUP: Lazy<HashMap<&'static str, &'static [(&'static str, &'static str)]>> =
    Lazy::new(|| SAFE_ABBREVIATIONS.iter().copied().collect());

static EXPANSIONS: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CONTEXT_EXPANSIONS.iter().copied().collect());

// Word-boundary pattern over all expansion keys, longest first so multi-char
// keys win over their prefixes.
static EXPAND_RE: Lazy<Regex> = Lazy::new(|| {
    let mut keys: Vec<&str> = EXPANSIONS.keys().copied().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let escaped: Vec<String> = keys.iter().map(|k| regex::escape(k)).collect();
    Regex::new(&format!(r"(?i)\b({})\b", escaped.join("|"))).unwrap()
});

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

/// Look up a safe WoW abbreviation (Tier 1).
pub fn lookup_abbreviation(text: &str, target_lang: &str) -> Option<&'static str> {
    let norm = text.trim().to_lowercase();
    let entry = SAFE_LOOKUP.get(norm.as_str())?;
    let tgt = target_lang.to_uppercase();
    let result = entry
        .iter()
        .find(|(lang, _)| *lang == tgt)
        .map(|(_, val)| *val);
    if let Some(val) = result {
        debug!("Glossary abbrev hit: {:?} -> {} = {:?}", norm, tgt, val);
    }
    result
}

/// Expand WoW-specific terms to plain English (Tier 2, context-gated).
///
/// Only expands when the message contains `CONTEXT_GATE`+ recognized gaming
/// terms; `NEVER_EXPAND` words are left alone. Returns the expanded text,
/// identical to the input when the gate is not met.
pub fn expand_wow_terms(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    for m in WORD_RE.find_iter(&lower) {
        let word = m.as_str();
        if EXPANSIONS.contains_key(word) && !NEVER_EXPAND.contains(word) {
            seen.insert(word);
        }
    }
    if seen.len() < CONTEXT_GATE {
        return text.to_string();
    }

    let result = EXPAND_RE.replace_all(text, |caps: &regex::Captures| {
        let word = caps[0].to_lowercase();
        if NEVER_EXPAND.contains(word.as_str()) {
            return caps[0].to_string();
        }
        EXPANSIONS
            .get(word.as_str())
            .map(|e| e.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    });

    if result != text {
        info!("WoW terms expanded: {:?} -> {:?}", text, result);
    }
    result.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier1_lookup_hits() {
        assert_eq!(lookup_abbreviation("gz", "EN"), Some("congratulations"));
        assert_eq!(lookup_abbreviation("gz", "RU"), Some("поздравляю"));
        assert_eq!(lookup_abbreviation("ilvl", "RU"), Some("уровень предметов"));
        assert_eq!(lookup_abbreviation("boe", "EN"), Some("bind on equip"));
    }

    #[test]
    fn tier1_lookup_is_case_insensitive() {
        assert_eq!(lookup_abbreviation("GZ", "en"), Some("congratulations"));
        assert_eq!(lookup_abbreviation(" Gratz ", "EN"), Some("congratulations"));
    }

    #[test]
    fn tier1_miss() {
        assert_eq!(lookup_abbreviation("hello", "EN"), None);
        assert_eq!(lookup_abbreviation("gz", "XX"), None);
    }

    #[test]
    fn tier1_table_has_full_coverage() {
        // Every entry must carry at least an EN value.
        for (key, translations) in SAFE_ABBREVIATIONS {
            assert!(
                translations.iter().any(|(lang, _)| *lang == "EN"),
                "{} lacks an EN value",
                key
            );
        }
        assert!(SAFE_ABBREVIATIONS.len() >= 60);
    }

    #[test]
    fn single_term_is_not_expanded() {
        // One recognized term is below the context gate.
        assert_eq!(expand_wow_terms("need a tank"), "need a tank");
    }

    #[test]
    fn two_terms_trigger_expansion() {
        let out = expand_wow_terms("lf mt and healer for icc");
        assert!(out.contains("main tank"), "got: {}", out);
        assert!(out.contains("Icecrown Citadel raid"), "got: {}", out);
    }

    #[test]
    fn never_expand_words_survive() {
        // "focus" and "fire" are real words; they never get expanded and
        // never count toward the gate.
        assert_eq!(
            expand_wow_terms("focus fire on the boss"),
            "focus fire on the boss"
        );
    }

    #[test]
    fn expansion_is_case_insensitive() {
        let out = expand_wow_terms("MT goes first, OT picks up adds");
        assert!(out.contains("main tank"));
        assert!(out.contains("off tank"));
        assert!(out.contains("extra enemies"));
    }

    #[test]
    fn expansion_table_is_large_and_never_expand_disjoint() {
        assert!(CONTEXT_EXPANSIONS.len() >= 250);
        for (key, _) in CONTEXT_EXPANSIONS {
            assert!(
                !NEVER_EXPAND.contains(key),
                "{} is both an expansion and never-expand",
                key
            );
        }
    }
}
