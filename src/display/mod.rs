pub mod html;
pub mod output;
pub mod repl;
