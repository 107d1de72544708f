//! Image prompt construction.

use crate::scene::Scene;

/// Build the image generation prompt for a scene.
///
/// Pins the portrait aspect ratio and asks for the narration text as a
/// headline overlay so every slide reads like a title card.
pub fn build_image_prompt(scene: &Scene) -> String {
    format!(
        "A dramatic, cinematic thumbnail showing {}. \
         Bold headline text overlay: '{}'. \
         9:16 aspect ratio, high contrast, vibrant colors",
        scene.visual, scene.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_scene_fields() {
        let scene = Scene::new(0, 0.0, 3.0, "Rust is fast", "a crab on a racetrack").unwrap();
        let prompt = build_image_prompt(&scene);

        assert!(prompt.contains("a crab on a racetrack"));
        assert!(prompt.contains("'Rust is fast'"));
        assert!(prompt.contains("9:16"));
    }
}
