//! Interactive chat session (`chatbot chat`).
//!
//! Reads lines with `rustyline-async`, sends each one to `/chat` and keeps the
//! conversation id the backend hands back. The identity session lives as long
//! as the loop. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
