//! Localized prompt texts and system prompt assembly

use crate::config::{BrainConfig, Language, MeetingType, Personality};

fn personality_clause(personality: Personality, language: Language) -> &'static str {
    match (language, personality) {
        (Language::Ru, Personality::Professional) => {
            "Ты профессиональный ИИ-ассистент на деловой встрече. Говоришь четко, по существу и вежливо."
        }
        (Language::Ru, Personality::Friendly) => {
            "Ты дружелюбный ИИ-ассистент. Общаешься тепло и непринужденно, создаешь комфортную атмосферу."
        }
        (Language::Ru, Personality::Assistant) => {
            "Ты внимательный ИИ-помощник. Помогаешь участникам встречи, подсказываешь и уточняешь детали."
        }
        (Language::Ru, Personality::Expert) => {
            "Ты ИИ-эксперт в обсуждаемой теме. Даешь точные, обоснованные ответы и делишься профессиональными знаниями."
        }
        (Language::En, Personality::Professional) => {
            "You are a professional AI assistant in a business meeting. You speak clearly, to the point and politely."
        }
        (Language::En, Personality::Friendly) => {
            "You are a friendly AI assistant. You talk warmly and casually and keep the atmosphere comfortable."
        }
        (Language::En, Personality::Assistant) => {
            "You are an attentive AI helper. You support the meeting participants, give hints and clarify details."
        }
        (Language::En, Personality::Expert) => {
            "You are an AI expert on the topic under discussion. You give precise, well-grounded answers and share professional knowledge."
        }
    }
}

fn meeting_type_clause(meeting_type: MeetingType, language: Language) -> &'static str {
    match (language, meeting_type) {
        (Language::Ru, MeetingType::Business) => {
            "Это деловая встреча: фокусируйся на целях, решениях и результатах."
        }
        (Language::Ru, MeetingType::Casual) => {
            "Это неформальная встреча: можно общаться свободно и дружелюбно."
        }
        (Language::Ru, MeetingType::Presentation) => {
            "Это презентация: помогай раскрывать ключевые идеи и отвечай на вопросы аудитории."
        }
        (Language::Ru, MeetingType::Interview) => {
            "Это интервью: задавай уместные вопросы и внимательно слушай ответы."
        }
        (Language::En, MeetingType::Business) => {
            "This is a business meeting: focus on goals, decisions and outcomes."
        }
        (Language::En, MeetingType::Casual) => {
            "This is an informal meeting: keep the conversation relaxed and friendly."
        }
        (Language::En, MeetingType::Presentation) => {
            "This is a presentation: help bring out the key ideas and answer the audience's questions."
        }
        (Language::En, MeetingType::Interview) => {
            "This is an interview: ask relevant questions and listen carefully to the answers."
        }
    }
}

fn language_clause(language: Language) -> &'static str {
    match language {
        Language::Ru => "Отвечай на русском языке.",
        Language::En => "Respond in English.",
    }
}

fn meeting_context_label(language: Language) -> &'static str {
    match language {
        Language::Ru => "Контекст встречи",
        Language::En => "Meeting context",
    }
}

fn rules_block(language: Language) -> &'static str {
    match language {
        Language::Ru => concat!(
            "Правила:\n",
            "1. Отвечай кратко (максимум 2-3 предложения).\n",
            "2. Говори по существу и по теме встречи.\n",
            "3. Задавай уточняющие вопросы, если это необходимо.\n",
            "4. Сохраняй профессиональный тон.\n",
            "5. Не повторяй уже сказанную информацию."
        ),
        Language::En => concat!(
            "Rules:\n",
            "1. Be concise (2-3 sentences at most).\n",
            "2. Stay relevant to the meeting topic.\n",
            "3. Ask clarifying questions when needed.\n",
            "4. Keep a professional tone.\n",
            "5. Do not repeat information that was already given."
        ),
    }
}

/// Assemble the system prompt for `config`.
///
/// Order is fixed: personality, meeting type, language, meeting context,
/// rules. Identical configs always produce identical text.
pub fn build_system_prompt(config: &BrainConfig) -> String {
    let language = config.language;
    [
        personality_clause(config.personality, language).to_string(),
        meeting_type_clause(config.meeting_type, language).to_string(),
        language_clause(language).to_string(),
        format!("{}: {}", meeting_context_label(language), config.meeting_context),
        rules_block(language).to_string(),
    ]
    .join("\n\n")
}

/// Attach session metadata to a raw utterance as `"{input} (Context: {context})"`.
/// Blank context leaves the input untouched.
pub fn with_context(input: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("{} (Context: {})", input, context),
        None => input.to_string(),
    }
}

/// Summarization instruction; the transcript follows it on the next line
pub fn summary_instruction(language: Language) -> &'static str {
    match language {
        Language::Ru => concat!(
            "Составь краткое резюме встречи на основе диалога ниже. Структура:\n",
            "1. Основные темы\n",
            "2. Ключевые решения\n",
            "3. Следующие шаги\n",
            "4. Открытые вопросы\n\n",
            "Диалог:"
        ),
        Language::En => concat!(
            "Write a short summary of the meeting based on the dialogue below. Structure:\n",
            "1. Main topics\n",
            "2. Key decisions\n",
            "3. Next steps\n",
            "4. Open questions\n\n",
            "Dialogue:"
        ),
    }
}

/// Spoken when the completion backend fails
pub fn fallback_reply(language: Language) -> &'static str {
    match language {
        Language::Ru => "Извините, произошла ошибка. Попробуйте еще раз.",
        Language::En => "Sorry, an error occurred. Please try again.",
    }
}

/// Returned when a summary cannot be produced
pub fn summary_fallback(language: Language) -> &'static str {
    match language {
        Language::Ru => "Не удалось сгенерировать резюме встречи.",
        Language::En => "Could not generate the meeting summary.",
    }
}
