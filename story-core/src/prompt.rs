//! Prompt assembly.
//!
//! Values are substituted verbatim; nothing is escaped or validated, so the
//! builder is total over any input strings.

use crate::params::StoryParameters;

/// Persona sent as the system message of every completion.
pub const SYSTEM_PROMPT: &str = "You are a creative AI story generator.";

/// Build the narrative instruction for one generation request.
pub fn build_prompt(params: &StoryParameters) -> String {
    format!(
        "You are observing the world as a {perspective}. It is {time_of_day}, and the weather is {weather}.\n\
         You are in a {environment} environment. As you move through this space, describe your interaction with {interaction}.\n\
         Make sure to include elements that reflect the topic of {topic}.\n\
         Focus on sensory observations such as sights, sounds, and textures, and reflect on the experience from your unique perspective.",
        perspective = params.perspective,
        time_of_day = params.time_of_day,
        weather = params.weather,
        environment = params.environment,
        interaction = params.interaction_target,
        topic = params.topic,
    )
}
