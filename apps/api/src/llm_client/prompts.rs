// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces bare-text output.
pub const PLAIN_TEXT_ONLY_SYSTEM: &str = "You MUST respond with the requested text only. \
    Do NOT wrap it in quotes or markdown code fences. \
    Do NOT include explanations, notes, or apologies.";

/// Instruction that protects placeholder tokens inserted before the call.
pub const PLACEHOLDER_INSTRUCTION: &str = "\
    CRITICAL: Tokens of the form <<T0>>, <<T1>>, ... are placeholders for protected terms. \
    Copy every placeholder into your answer exactly as written, once each, \
    in the position that fits the translated sentence. Never translate, split, or drop them.";
