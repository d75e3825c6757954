//! Presentation view models

mod reaction_bar;

pub use reaction_bar::{
    ButtonView, QuickPickOption, ReactionBar, ReactionBarEvent, ReactionBarView,
};
