//! `orim-agent classify`: print the command label for a message.

pub fn run(text: &str) {
    println!("{}", orim_agent::classify(text));
}
