//! LLM prompt constants for flashcard generation.
//!
//! The model returns a JSON array of `{"front": "...", "back": "..."}` objects.
//! Callers locate and decode it with `cards::parse_cards`.

pub const FLASHCARD_SYSTEM: &str = "\
You are a study assistant that writes concise, accurate flashcards from course material. \
Use only facts stated in the material. Respond with a JSON array only.";

pub const FLASHCARD_PROMPT_TEMPLATE: &str = "\
Create exactly {num_cards} flashcards from the following study material.\n\
Each flashcard should have:\n\
1. A clear question or concept on the front\n\
2. A concise answer or explanation on the back\n\
\n\
Focus on the most important concepts in the material and try to cover different topics.\n\
Make sure each card has substantial content on both front and back sides.\n\
Be concise but thorough in your responses.\n\
\n\
For example:\n\
Q: What is the capital of France?\n\
A: Paris\n\
\n\
Study material:\n\
{study_text}\n\
\n\
Format your response as a JSON array with objects containing only \"front\" and \"back\" fields.\n\
Ensure you generate exactly {num_cards} flashcards in total.\n\
The \"back\" field MUST contain substantive content for every card.\n\
Do not include any hints or extra information fields.";
