//! Cross-component integration tests.

#[cfg(test)]
mod fixtures;
mod flows;
mod scenarios;
