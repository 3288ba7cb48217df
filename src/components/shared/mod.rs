pub mod instruction_footer;
pub mod search_input;

pub use instruction_footer::InstructionFooter;
pub use search_input::SearchInput;
