/*!
 * Prompt templates for the four tutor operations.
 *
 * Every template asks for a single JSON object so the answer can be parsed
 * with serde. Definitions and translations are requested in the learner's
 * native language.
 */

use super::models::GenerateRequest;

/// System prompt shared by all operations.
pub const TUTOR_SYSTEM: &str = r#"You are an English tutor for learners whose native language is {native_language}.

## Output Requirements
- Return ONLY one valid JSON object matching the requested schema
- Do not wrap the JSON in markdown or add any text outside it
- Write definitions and translations in {native_language}
- Use CEFR levels A1, A2, B1, B2, C1 or C2 for the "cefr" field"#;

const VOCABULARY_SCHEMA: &str = r#"{"word": string, "definition": string, "translation": string, "pronunciation": string, "type": string, "cefr": string}"#;

/// Render the system prompt
pub fn system_prompt(native_language: &str) -> String {
    TUTOR_SYSTEM.replace("{native_language}", native_language)
}

/// Prompt for generating a new reading text
pub fn generate_prompt(request: &GenerateRequest) -> String {
    format!(
        "Write an original English text about \"{topic}\" for a {difficulty} learner (CEFR {band}). \
         It should be about {words} words long.\n\
         Then pick 8 to 15 words or multi-word phrases from the text that a learner at this level should study. \
         Each \"word\" must appear in the text exactly as written.\n\n\
         Respond with: {{\"title\": string, \"text\": string, \"vocabulary\": [{schema}]}}",
        topic = request.topic.trim(),
        difficulty = request.difficulty,
        band = request.difficulty.cefr_band(),
        words = request.length.target_words(),
        schema = VOCABULARY_SCHEMA,
    )
}

/// Prompt for extracting vocabulary from a learner-supplied text
pub fn analyze_prompt(text: &str) -> String {
    format!(
        "Analyze the following English text. Give it a short title and pick 8 to 15 words or \
         multi-word phrases worth studying. Each \"word\" must appear in the text exactly as written.\n\n\
         TEXT:\n\"\"\"\n{text}\n\"\"\"\n\n\
         Respond with: {{\"title\": string, \"vocabulary\": [{schema}]}}",
        text = text,
        schema = VOCABULARY_SCHEMA,
    )
}

/// Prompt for defining a single word or phrase
pub fn lookup_prompt(word: &str, context_snippet: &str) -> String {
    format!(
        "Define the English word or phrase \"{word}\" as it is used in this passage:\n\
         \"\"\"\n{context}\n\"\"\"\n\n\
         Respond with: {{\"definition\": string, \"translation\": string, \"pronunciation\": string, \"type\": string, \"cefr\": string}}",
        word = word,
        context = context_snippet,
    )
}

/// Prompt for scoring a learner's translation
pub fn evaluate_prompt(original: &str, translation: &str, native_language: &str) -> String {
    format!(
        "A learner translated the English text below into {language}. Score the translation from 0 to 100 \
         for accuracy and naturalness, explain the score briefly, give a corrected translation, list the key \
         improvements and the English words the learner struggled with.\n\n\
         ORIGINAL:\n\"\"\"\n{original}\n\"\"\"\n\n\
         TRANSLATION:\n\"\"\"\n{translation}\n\"\"\"\n\n\
         Respond with: {{\"score\": number, \"feedback\": string, \"correctedTranslation\": string, \
         \"keyImprovements\": [string], \"difficultWords\": [string]}}",
        language = native_language,
        original = original,
        translation = translation,
    )
}
