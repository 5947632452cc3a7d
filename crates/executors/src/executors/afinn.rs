//! Word valence scores in the AFINN style: integers from -5 (very negative)
//! to +5 (very positive).

use std::collections::HashMap;

use lazy_static::lazy_static;

const ENTRIES: &[(&str, i32)] = &[
    ("abandon", -2),
    ("abandoned", -2),
    ("abuse", -3),
    ("accept", 1),
    ("accepted", 1),
    ("admire", 3),
    ("adore", 3),
    ("affection", 3),
    ("afraid", -2),
    ("aggressive", -2),
    ("agree", 1),
    ("alarm", -2),
    ("amazing", 4),
    ("anger", -3),
    ("angry", -3),
    ("annoy", -2),
    ("annoyed", -2),
    ("anxious", -2),
    ("appreciate", 2),
    ("awesome", 4),
    ("awful", -3),
    ("bad", -3),
    ("beautiful", 3),
    ("best", 3),
    ("better", 2),
    ("bitter", -2),
    ("blame", -2),
    ("bless", 2),
    ("bored", -2),
    ("boring", -3),
    ("brave", 2),
    ("breathtaking", 5),
    ("brilliant", 4),
    ("broken", -1),
    ("calm", 2),
    ("care", 2),
    ("catastrophic", -4),
    ("celebrate", 3),
    ("charming", 3),
    ("cheer", 2),
    ("cheerful", 2),
    ("clean", 2),
    ("clever", 2),
    ("comfortable", 2),
    ("confident", 2),
    ("confused", -2),
    ("cool", 1),
    ("crap", -3),
    ("crazy", -2),
    ("cruel", -3),
    ("cry", -1),
    ("damage", -3),
    ("danger", -2),
    ("dead", -3),
    ("death", -2),
    ("delight", 3),
    ("delighted", 3),
    ("depressed", -2),
    ("despair", -3),
    ("destroy", -3),
    ("difficult", -1),
    ("dirty", -2),
    ("disappoint", -2),
    ("disappointed", -2),
    ("disaster", -2),
    ("disgusting", -3),
    ("dislike", -2),
    ("dumb", -3),
    ("eager", 2),
    ("easy", 1),
    ("enjoy", 2),
    ("enthusiastic", 3),
    ("evil", -3),
    ("excellent", 3),
    ("excited", 3),
    ("exciting", 3),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("fair", 2),
    ("fake", -3),
    ("fantastic", 4),
    ("fear", -2),
    ("fine", 2),
    ("fool", -2),
    ("free", 1),
    ("fresh", 1),
    ("friendly", 2),
    ("fun", 4),
    ("funny", 4),
    ("glad", 3),
    ("gloomy", -2),
    ("good", 3),
    ("gorgeous", 3),
    ("grateful", 3),
    ("great", 3),
    ("greed", -3),
    ("grief", -2),
    ("happy", 3),
    ("harm", -2),
    ("hate", -3),
    ("hated", -3),
    ("hateful", -3),
    ("healthy", 2),
    ("help", 2),
    ("helpful", 2),
    ("hope", 2),
    ("hopeless", -2),
    ("horrible", -3),
    ("hurt", -2),
    ("ignorant", -2),
    ("ill", -2),
    ("impressive", 3),
    ("inspired", 2),
    ("interesting", 2),
    ("joy", 3),
    ("kind", 2),
    ("lame", -2),
    ("laugh", 1),
    ("lazy", -1),
    ("like", 2),
    ("lonely", -2),
    ("lose", -3),
    ("loss", -3),
    ("love", 3),
    ("loved", 3),
    ("lovely", 3),
    ("lucky", 3),
    ("mad", -3),
    ("merry", 3),
    ("miserable", -3),
    ("mistake", -2),
    ("nasty", -3),
    ("nice", 3),
    ("outstanding", 5),
    ("pain", -2),
    ("panic", -3),
    ("peace", 2),
    ("perfect", 3),
    ("pleasant", 3),
    ("pleased", 3),
    ("poor", -2),
    ("positive", 2),
    ("pretty", 1),
    ("problem", -2),
    ("proud", 2),
    ("rejected", -1),
    ("relaxed", 2),
    ("rich", 2),
    ("ridiculous", -3),
    ("rude", -2),
    ("sad", -2),
    ("safe", 1),
    ("satisfied", 2),
    ("scared", -2),
    ("shame", -2),
    ("sick", -2),
    ("smile", 2),
    ("sorry", -1),
    ("stupid", -2),
    ("success", 2),
    ("successful", 3),
    ("suffer", -2),
    ("super", 3),
    ("superb", 5),
    ("support", 2),
    ("sweet", 2),
    ("terrible", -3),
    ("terrific", 4),
    ("thank", 2),
    ("thanks", 2),
    ("thrilled", 5),
    ("tired", -2),
    ("trust", 1),
    ("ugly", -3),
    ("unhappy", -2),
    ("upset", -2),
    ("useful", 2),
    ("useless", -2),
    ("violent", -3),
    ("want", 1),
    ("warm", 1),
    ("weak", -2),
    ("win", 4),
    ("winner", 4),
    ("wonderful", 4),
    ("worried", -3),
    ("worse", -3),
    ("worst", -3),
    ("wow", 4),
    ("wrong", -2),
    ("yes", 1),
];

lazy_static! {
    pub static ref LEXICON: HashMap<&'static str, i32> = ENTRIES.iter().copied().collect();
}

/// Words that invert the valence of the word that follows them.
pub const NEGATORS: &[&str] = &[
    "aint", "ain't", "cannot", "cant", "can't", "darent", "daren't", "didnt", "didn't", "doesnt",
    "doesn't", "dont", "don't", "hadnt", "hadn't", "hasnt", "hasn't", "havent", "haven't",
    "isnt", "isn't", "mightnt", "mightn't", "mustnt", "mustn't", "neednt", "needn't", "never",
    "no", "nobody", "none", "not", "oughtnt", "oughtn't", "shant", "shan't", "shouldnt",
    "shouldn't", "wasnt", "wasn't", "werent", "weren't", "without", "wont", "won't", "wouldnt",
    "wouldn't",
];

pub fn score(word: &str) -> Option<i32> {
    LEXICON.get(word).copied()
}

pub fn is_negator(word: &str) -> bool {
    NEGATORS.contains(&word)
}
