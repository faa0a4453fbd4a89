use groq_ox::Model;

/// Source model fragments and their targets, checked in order.
const MODEL_TABLE: &[(&str, Model)] = &[
    ("claude-3-5-sonnet", Model::Llama3_3_70bVersatile),
    ("claude-3-haiku", Model::Llama3_1_8bInstant),
    ("claude-3-sonnet", Model::Llama3_1_70bVersatile),
];

/// Map a Messages API model id to a Groq model id.
///
/// The first table entry whose fragment occurs in `source` wins; anything
/// else maps to `default_model`.
pub fn map_model(source: &str, default_model: &str) -> String {
    MODEL_TABLE
        .iter()
        .find(|(fragment, _)| source.contains(fragment))
        .map_or_else(|| default_model.to_string(), |(_, model)| model.to_string())
}
