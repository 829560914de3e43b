pub mod fixtures;

#[cfg(test)]
mod announcement_tests;
#[cfg(test)]
mod chat_tests;
#[cfg(test)]
mod health_tests;
#[cfg(test)]
mod presence_tests;
#[cfg(test)]
mod ws_tests;
