//! Fixed vocabulary and sentinel tokens for the recognizer

/// Placeholder the recognizer reports when it picked up audio but matched no word
pub const NO_SPEECH_SENTINEL: &str = "<...>";

/// Base word list every listening session activates with.
///
/// Tuned for open-ended small talk with the robot. Callers can extend it
/// per session via `Vocabulary::with_extras`.
pub const BASE_VOCABULARY: &[&str] = &[
    // Greetings and courtesy
    "hello", "hi", "hey", "good", "morning", "afternoon", "evening", "please", "thank", "you",
    "thanks", "welcome", "sorry",
    // Question words
    "what", "how", "where", "when", "why", "who", "which", "can", "do", "are", "is", "will",
    "would", "could", "should",
    // Acknowledgements
    "yes", "no", "maybe", "sure", "okay", "right", "wrong", "true", "false",
    // Actions and commands
    "tell", "me", "about", "talk", "speak", "listen", "look", "see", "move", "walk", "turn",
    "stop", "go", "come", "help", "show",
    // Objects and places
    "robot", "nao", "computer", "table", "chair", "room", "house", "outside", "ball", "red",
    "blue", "green", "yellow", "black", "white",
    // People
    "i", "we", "they", "he", "she", "friend", "family", "people",
    // Time
    "time", "today", "yesterday", "tomorrow", "now", "later", "before", "after", "day", "night",
    "week", "month", "year",
    // Numbers
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    // Feelings
    "happy", "sad", "bad", "great", "fine", "tired", "hungry", "cold", "hot",
    // Conversation topics
    "weather", "music", "book", "movie", "food", "game", "sport", "news", "work", "school",
    "learn", "teach", "study", "read", "write",
    // Function words
    "and", "or", "but", "because", "if", "then", "also", "too", "very", "really", "quite",
    "just", "only", "all", "some", "many", "few", "the", "a", "an", "this", "that", "these",
    "those",
    // Farewells
    "bye", "goodbye", "quit", "exit", "end",
    // Self-test
    "test", "check", "try", "start", "begin",
];
