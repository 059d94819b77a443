//! The story screens around the levels: intro slideshow, per-level briefings, the level-stats
//! interstitial and the outro.

pub mod dialogs;
pub mod intro;
pub mod outro;
pub mod stats;

pub use dialogs::StoryDialogs;
pub use intro::Intro;
pub use outro::Outro;
pub use stats::LevelStats;

/// The intro slideshow, one entry per slide.
pub const INTRO_SLIDES: [&str; 4] = [
    "The year is 3000. A century ago every nation on Earth joined the International Space \
     Research Project, and humanity stands on the verge of reaching another galaxy.",
    "Then the truth came out: the engines of the great faster-than-light ship had been draining \
     the planet for decades. Earth is in an energy crisis, and every project is on hold.",
    "Sarah, a 22 year old scientist from Indonesia, has found three new elements that could end \
     the crisis. Her only samples came from the debris of a comet.",
    "She believes all three can be mined at the edge of the Kuiper belt. Earth has seven years \
     of energy left. Sarah and her crew are its only hope.",
];

/// Briefings shown when each level starts, by level number minus one.
pub const LEVEL_BRIEFINGS: [&str; 3] = [
    "First element: Nethonite. Sapphire blue and made entirely of Dimensium. Spun fast enough in \
     a vacuum sphere it produces a steady, enormous voltage.",
    "Second element: Photosium. It absorbs photons so efficiently that it could power every solar \
     plant on Earth. It is found on a green dwarf planet in the belt.",
    "Last element: Electricium. It conducts 230 times better than copper, enough to carry the \
     power the other two minerals produce.",
];
