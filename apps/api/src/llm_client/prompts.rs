// Cross-cutting prompt fragments. Feature prompts live next to their callers.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that reads candidate documents.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only use facts that appear in the provided material. \
    Never guess contact details, employers, dates or qualifications. \
    Use null or an empty list when a value is not present.";
