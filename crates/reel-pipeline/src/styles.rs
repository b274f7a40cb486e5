//! Image style catalog.
//!
//! One style is drawn per job so every image in a video shares a look.

use rand::prelude::IndexedRandom;

pub const IMAGE_STYLES: [&str; 9] = [
    "A photorealistic photo that looks shot on a high-end DSLR in natural light, with true skin \
     tones, natural shadows, shallow depth of field and detailed real textures. No illustration, \
     CGI or stylization. No text, watermarks or logos.",
    "A documentary photograph of an unstaged moment, as a field journalist would capture it: soft \
     natural light, realistic tones, slight imperfections in framing or focus. No dramatic \
     grading or artificial composition. No text or overlays.",
    "A 1970s analog film photograph with faded warm colors, visible grain, light leaks and soft \
     edges, slightly desaturated skin tones and period clothing. No modern digital sharpness. No \
     text or anachronisms.",
    "A high-contrast black and white film noir photograph with hard directional light, long \
     shadows and grainy texture in a period setting. No color or flat lighting. No logos or \
     overlays.",
    "A soft watercolor painting on textured paper with pastel tones, loose organic edges and \
     colors bleeding into each other, favoring mood over detail. No hard lines or photorealism. \
     No text.",
    "A child's crayon drawing on white paper with bold primary colors, wobbly outlines, naive \
     perspective and scribbled backgrounds. No polish or realism. No logos or digital effects.",
    "A hand-drawn 2D cel-shaded animation frame with clean line work, flat layered shading, \
     painterly backgrounds and expressive characters. No 3D rendering or photo textures. No text \
     or UI.",
    "A modern comic book panel with bold ink lines, halftone shading, dynamic action lines, \
     dramatic poses and saturated high-contrast color. No photographic realism. No speech \
     bubbles, captions or watermarks.",
    "A classic hand-drawn feature animation frame with expressive cartoon characters, clean ink \
     lines, storybook lighting and painted backgrounds. No 3D effects or modern digital polish. \
     No captions or logos.",
];

/// Draw one style uniformly at random.
pub fn random_style() -> &'static str {
    let mut rng = rand::rng();
    IMAGE_STYLES
        .choose(&mut rng)
        .copied()
        .unwrap_or(IMAGE_STYLES[0])
}

/// Image prompt for one sentence.
pub fn image_prompt(sentence: &str, style: &str, title: &str) -> String {
    format!(
        "{} {} This is the general topic: {}",
        sentence.trim(),
        style,
        title
    )
}
