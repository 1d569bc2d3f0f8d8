use std::path::Path;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

use crate::types::Category;

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 4;

pub type Options = SmallVec<[String; MAX_OPTIONS]>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Options,
    pub correct: usize,
    #[serde(deserialize_with = "deserialize_category")]
    pub category: Category,
}

impl Question {
    pub fn new<S: Into<String>>(
        prompt: S,
        options: impl IntoIterator<Item = S>,
        correct: usize,
        category: Category,
    ) -> Result<Self, DeckError> {
        let question = Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct,
            category,
        };
        question.validate()?;
        Ok(question)
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.correct
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }

    fn validate(&self) -> Result<(), DeckError> {
        let reason = if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.options.len()) {
            Some("expected between 2 and 4 options")
        } else if self.correct >= self.options.len() {
            Some("correct option index out of range")
        } else if self.prompt.trim().is_empty() {
            Some("empty prompt")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(DeckError::InvalidQuestion {
                prompt: self.prompt.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("unknown category '{0}'")]
    InvalidCategory(String),
    #[error("category {0} has no questions")]
    EmptyCategory(Category),
    #[error("malformed question '{prompt}': {reason}")]
    InvalidQuestion {
        prompt: String,
        reason: &'static str,
    },
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse question bank: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a category name, ignoring case and surrounding whitespace.
pub fn parse_category(name: &str) -> Result<Category, DeckError> {
    Category::from_str(name.trim()).map_err(|_| DeckError::InvalidCategory(name.to_string()))
}

fn deserialize_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Category, D::Error> {
    let name = String::deserialize(deserializer)?;
    parse_category(&name).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    decks: [Vec<Question>; 3],
}

static STANDARD_BANK: Lazy<QuestionBank> = Lazy::new(|| {
    let mut decks: [Vec<Question>; 3] = Default::default();
    for (category, raw) in [
        (Category::Food, FOOD_DECK),
        (Category::Daily, DAILY_DECK),
        (Category::Special, SPECIAL_DECK),
    ] {
        decks[category.index()] = raw
            .iter()
            .map(|(prompt, options, correct)| Question {
                prompt: prompt.to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
                correct: *correct,
                category,
            })
            .collect();
    }
    QuestionBank { decks }
});

impl QuestionBank {
    /// The built-in blessing deck.
    pub fn standard() -> Self {
        STANDARD_BANK.clone()
    }

    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Result<Self, DeckError> {
        let mut decks: [Vec<Question>; 3] = Default::default();
        for question in questions {
            question.validate()?;
            decks[question.category.index()].push(question);
        }
        Ok(Self { decks })
    }

    /// Loads a JSON array of questions, e.g.
    /// `[{"prompt": "...", "options": ["a", "b"], "correct": 0, "category": "Food"}]`.
    pub fn from_json_str(json: &str) -> Result<Self, DeckError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::from_questions(questions)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn deck(&self, category: Category) -> &[Question] {
        &self.decks[category.index()]
    }

    pub fn question(&self, category: Category, index: usize) -> Option<&Question> {
        self.decks[category.index()].get(index)
    }

    pub fn len(&self, category: Category) -> usize {
        self.decks[category.index()].len()
    }

    /// Categories that can actually be drawn from.
    pub fn playable_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| !self.deck(*category).is_empty())
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

type RawQuestion = (&'static str, &'static [&'static str], usize);

const FOOD_DECK: &[RawQuestion] = &[
    (
        "What is the blessing for bread?",
        &["Hamotzi", "Mezonot", "Shehakol", "Ha'adama"],
        0,
    ),
    (
        "In what language should berachot ideally be recited?",
        &["Any language is fine", "Hebrew if possible", "Only Hebrew", "Only Aramaic"],
        1,
    ),
    (
        "Which of the following is not a category under food blessings (Birchot Ha'nehenin)?",
        &["Ha'Eitz", "Ha'Adamah", "Mezonot", "Ha'Mitvot"],
        3,
    ),
    (
        "True or False: Birchot Ha'nehenin include blessings said over both food and fragrance.",
        &["True", "False"],
        0,
    ),
    (
        "How much must be eaten for a food to require a Bracha Rishona (first blessing)?",
        &["A full meal", "A kizayit", "Any amount", "A half portion"],
        2,
    ),
    (
        "What is the defining feature of a tree that requires the blessing Ha'Eitz?",
        &["It bears citrus fruit", "It grows on vines", "It continues to produce from year to year", "It grows below ground"],
        2,
    ),
    (
        "Which food category has the highest priority in halachic importance?",
        &["HaEitz", "Mezonot", "HaMotzi", "HaAdamah"],
        2,
    ),
    (
        "How much must be eaten for a food to require a Bracha Rishona?",
        &["A full meal", "A kizayit", "Any amount", "A half portion"],
        2,
    ),
    (
        "True or False: A kizayit is approximately 3.3-3.5 ounces.",
        &["True", "False"],
        1,
    ),
    (
        "True or False: If you prefer the taste of a HaAdamah food over a HaEitz food, HaAdamah comes first.",
        &["True", "False"],
        0,
    ),
    (
        "Which of the following is NOT one of the Shivat Haminim?",
        &["Fig", "Pomegranate", "Apple", "Grapes"],
        2,
    ),
    (
        "Mezonot is said over which foods?",
        &["Fruits only", "Raw vegetables", "Cooked or baked grain-based items", "Dairy items"],
        2,
    ),
    (
        "True or False: Noodles and cookies require the Mezonot blessing.",
        &["True", "False"],
        0,
    ),
    (
        "Which food requires a Shehakol blessing?",
        &["Apple", "Watermelon (raw)", "Potato latkes", "Grape juice"],
        2,
    ),
    (
        "Ha'Adamah is said when the source food _____ after producing fruit.",
        &["grows", "dies", "changes", "ripens"],
        1,
    ),
];

const DAILY_DECK: &[RawQuestion] = &[
    (
        "What is the first beracha we say in the morning?",
        &["Modeh Ani", "Shema", "Birkat Hamazon", "Asher Yatzar"],
        0,
    ),
    (
        "What is the beracha for seeing lightning?",
        &["Shehakol", "Oseh Ma'aseh Bereishit", "Ha'adama", "Hamotzi"],
        1,
    ),
    (
        "When do we say Birkat Hamazon?",
        &["Before eating", "After eating bread", "Before sleeping", "In the morning"],
        1,
    ),
    (
        "What blessing do we say after using the bathroom?",
        &["Modeh Ani", "Shema", "Asher Yatzar", "Al Netilat Yadayim"],
        2,
    ),
    (
        "When do we say the blessing for washing hands?",
        &["Before eating bread", "After eating", "Before sleeping", "After the bathroom"],
        0,
    ),
    (
        "What blessing do we say before studying Torah?",
        &["Shema", "La'asok B'divrei Torah", "Ahavat Olam", "Emet V'yatziv"],
        1,
    ),
    (
        "When do we say the Shema?",
        &["Morning and evening", "Afternoon only", "Morning only", "Evening only"],
        0,
    ),
    (
        "What blessing do we say on candles before Shabbat?",
        &["Borei Pri Hagafen", "L'hadlik Ner", "Hamotzi", "Shehecheyanu"],
        1,
    ),
    (
        "Why do we say Asher Yatzar after using the bathroom?",
        &["Because our body works with wondrous wisdom", "It's just tradition", "To be polite", "No special reason"],
        0,
    ),
    (
        "True or False: Only Birkat Hamazon is considered a Torah blessing by most authorities?",
        &["True", "False"],
        0,
    ),
    (
        "How many berachot should one try to say daily?",
        &["50", "75", "100", "150"],
        2,
    ),
    (
        "Complete the phrase: 'rofey _____ kol basar'",
        &["cholay", "cholim", "choleh", "cholot"],
        0,
    ),
    (
        "According to most authorities, only which blessing is a Torah commandment?",
        &["Birkat HaMazon", "Asher Yatzar", "HaMotzi", "Mezonot"],
        0,
    ),
    (
        "When should berachot generally be recited?",
        &["After enjoying something", "During the act", "Over lesiyatan – before receiving benefit", "Only on holidays"],
        2,
    ),
    (
        "Why did King David institute the recitation of 100 blessings daily?",
        &["People weren't praying", "It was commanded in the Torah", "People were dying without explanation", "There were 100 prophets"],
        2,
    ),
    (
        "What should you do if you begin a blessing but realize you have no food after saying Ado-noy?",
        &["Stop and say Baruch Shem", "Wait and then eat", "End with lamdeni chukecha", "Continue the blessing anyway"],
        2,
    ),
    (
        "True or False: You may say a blessing even if the food or water is not yet present.",
        &["True", "False"],
        1,
    ),
    (
        "If one realizes after saying 'Elokainu' that they have no food, they should say:",
        &["Nothing", "Baruch Shem Kevod Malchuto Leolam Vaed", "Start over", "Continue anyway"],
        1,
    ),
    (
        "When should a person recite the Asher Yatzar blessing?",
        &["After waking up", "After eating", "After leaving the bathroom", "Before sleeping"],
        2,
    ),
    (
        "True or False: The blessing Asher Yatzar refers to how the human body functions with wisdom.",
        &["True", "False"],
        0,
    ),
    (
        "True or False: After saying 'Elokainu' in error, you can continue with the blessing if you get food.",
        &["True", "False"],
        1,
    ),
];

const SPECIAL_DECK: &[RawQuestion] = &[
    (
        "What is the beracha for a new fruit?",
        &["Shehecheyanu", "Borei Pri Ha'etz", "Shehakol", "Hamotzi"],
        0,
    ),
    (
        "What is the beracha for hearing thunder?",
        &["Shehakol", "Oseh Ma'aseh Bereishit", "Shehecheyanu", "Hamotzi"],
        1,
    ),
    (
        "What blessing do we say on Chanukah candles?",
        &["L'hadlik Ner", "Shehecheyanu", "Both A and B", "Neither"],
        2,
    ),
    (
        "When do we say Shehecheyanu?",
        &["On new things", "Every morning", "Before eating", "Before sleeping"],
        0,
    ),
    (
        "What blessing do we say when seeing a rainbow?",
        &["Oseh Ma'aseh Bereishit", "Zocher HaBrit", "Shehecheyanu", "None"],
        1,
    ),
    (
        "What blessing do we say on seeing the ocean?",
        &["Shehecheyanu", "Oseh Ma'aseh Bereishit", "Zocher HaBrit", "None"],
        1,
    ),
    (
        "What blessing do we say on Rosh Hashanah apples?",
        &["Borei Pri Ha'etz", "Shehecheyanu", "Both A and B", "Neither"],
        2,
    ),
    (
        "What blessing do we say at a wedding?",
        &["Shehecheyanu", "Asher Bara", "Both A and B", "Neither"],
        1,
    ),
    (
        "When should berachot generally be recited?",
        &["After the action", "Before the action (over lesiyatan)", "During the action", "Anytime"],
        1,
    ),
    (
        "Who benefits from saying a beracha?",
        &["G-d", "The person saying it", "Both", "Neither"],
        1,
    ),
    (
        "Why do we recite berachot?",
        &["To thank G-d actively", "Because we have to", "To make noise", "No reason"],
        0,
    ),
    (
        "True or False: A person should say berachot by rote without thinking of their meaning",
        &["True", "False"],
        1,
    ),
    (
        "The word beracha comes from braycha, which means:",
        &["River", "Spring", "Blessing", "Prayer"],
        1,
    ),
    (
        "True or False: God receives benefit from our blessings.",
        &["True", "False"],
        1,
    ),
    (
        "Why do we recite berachot?",
        &["To earn reward", "To fulfill obligation", "To recognize and thank Hashem", "To announce holiness"],
        2,
    ),
    (
        "True or False: You may say a blessing even if the food or water is not yet present.",
        &["True", "False"],
        1,
    ),
    (
        "If you say Shehakol by mistake on any food, what should you do?",
        &["Always redo the blessing", "Continue eating - it's valid", "Say Baruch Shem", "Ask a rabbi"],
        1,
    ),
    (
        "Match the type of bracha: What requires Birchot Ha'nehenin?",
        &["Shofar", "Shmoneh Esrai", "Food", "Prayer"],
        2,
    ),
    (
        "True or False: According to most authorities, only Birkat Ha'mazon is a Torah commandment.",
        &["True", "False"],
        0,
    ),
    (
        "Why did King David institute 100 blessings daily?",
        &["People weren't praying", "Torah commanded it", "People were dying unexplainedly", "There were 100 prophets"],
        2,
    ),
    (
        "True or False: If Hashem stopped providing sustenance, all blessings would continue regardless.",
        &["True", "False"],
        1,
    ),
    (
        "The word 'beracha' comes from 'braycha,' which means:",
        &["River", "Spring", "Blessing", "Prayer"],
        1,
    ),
    (
        "True or False: The phrase 'Baruch Atah' means 'You are the source of all blessings.'",
        &["True", "False"],
        0,
    ),
    (
        "This recognition [of blessings] is strictly for _____, not for Hashem.",
        &["us", "them", "angels", "creation"],
        0,
    ),
    (
        "True or False: Hashem's involvement stops after the food has grown.",
        &["True", "False"],
        1,
    ),
];
