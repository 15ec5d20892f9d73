pub mod build;
pub mod commanders;
pub mod config;
pub mod legality;

/// Bad input: missing files, unknown commanders, ineligible leaders.
pub const EXIT_INPUT_ERROR: u8 = 2;
/// Collaborator or internal failure: network, rendering, output IO.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn input_error(message: impl Into<String>) -> Self {
        Self { exit_code: EXIT_INPUT_ERROR, output: format!("error: {}", message.into()) }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { exit_code: EXIT_FAILURE, output: format!("error: {}", message.into()) }
    }
}
