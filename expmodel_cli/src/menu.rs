//! Interactive text menu.
//!
//! Reads from any `BufRead` and writes to any `Write` so the whole dialogue
//! can be driven from a buffer. End of input leaves the menu cleanly from
//! whatever prompt is waiting.

use expmodel_core::config::DisplayConfig;
use expmodel_core::{parse_value, Error, Knowns, Model, Operation, Result, Variable};
use std::io::{BufRead, Write};

const SEPARATOR_WIDTH: usize = 50;

/// Whether the dialogue goes on after a step
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Menu<R, W> {
    input: R,
    output: W,
    display: DisplayConfig,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, display: DisplayConfig) -> Self {
        Self {
            input,
            output,
            display,
        }
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n--- Exponential Model Calculator ---")?;
            writeln!(self.output, "1. {}", Model::Decay.name())?;
            writeln!(self.output, "2. {}", Model::Cooling.name())?;
            writeln!(self.output, "3. Exit")?;

            let Some(choice) = self.read_line("Select an option (1-3): ")? else {
                return Ok(());
            };

            let flow = match choice.trim() {
                "1" => self.model_menu(Model::Decay)?,
                "2" => self.model_menu(Model::Cooling)?,
                "3" => Flow::Quit,
                other => {
                    writeln!(self.output, "Invalid option '{}'. Please choose 1, 2 or 3.", other)?;
                    Flow::Continue
                }
            };

            if flow == Flow::Quit {
                writeln!(self.output, "Goodbye.")?;
                return Ok(());
            }
        }
    }

    /// Operations of one model; `Continue` means "back to the top menu"
    fn model_menu(&mut self, model: Model) -> Result<Flow> {
        let operations = Operation::for_model(model);
        let back = operations.len() + 1;

        loop {
            writeln!(self.output, "\n--- {} calculator ---", model.name())?;
            writeln!(self.output, "Model: {}", model.equation())?;
            writeln!(self.output, "What do you want to find?")?;
            for (i, op) in operations.iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, op.title())?;
            }
            writeln!(self.output, "{}. Back", back)?;

            let prompt = format!("Select an option (1-{}): ", back);
            let Some(choice) = self.read_line(&prompt)? else {
                return Ok(Flow::Quit);
            };

            match choice.trim().parse::<usize>() {
                Ok(n) if n == back => return Ok(Flow::Continue),
                Ok(n) if (1..back).contains(&n) => {
                    if self.run_operation(operations[n - 1])? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                _ => {
                    writeln!(
                        self.output,
                        "Invalid option. Please choose a number from 1 to {}.",
                        back
                    )?;
                }
            }
            writeln!(self.output, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        }
    }

    fn run_operation(&mut self, operation: Operation) -> Result<Flow> {
        writeln!(self.output, "\n--- Find {} ---", operation.title())?;
        writeln!(self.output, "Formula: {}", operation.formula())?;

        let mut knowns = Knowns::new();
        for &variable in operation.inputs() {
            match self.prompt_value(variable)? {
                Some(value) => knowns.insert(variable, value),
                None => return Ok(Flow::Quit),
            }
        }

        match operation.solve(&knowns) {
            Ok(solution) => {
                writeln!(self.output, "\nResult: {}", solution.format(&self.display))?;
            }
            Err(Error::Domain(err)) => {
                writeln!(self.output, "Error: {}", err)?;
            }
            Err(e) => return Err(e),
        }

        Ok(Flow::Continue)
    }

    /// Ask for `variable` until the answer parses; `None` at end of input
    fn prompt_value(&mut self, variable: Variable) -> Result<Option<f64>> {
        let prompt = format!("Enter the {}: ", variable);
        loop {
            let Some(line) = self.read_line(&prompt)? else {
                return Ok(None);
            };

            match parse_value(&line, variable.symbol()) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => {
                    tracing::debug!("Re-prompting after bad input: {}", err);
                    writeln!(self.output, "Error: {}. Please enter a number.", err)?;
                }
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_menu(script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(Cursor::new(script), &mut output, DisplayConfig::default())
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_decay_final_quantity() {
        let out = run_menu("1\n1\n800\n0.015\n50\n7\n3\n");
        assert!(out.contains("Formula: N(t) = N0 * e^(-kt)"));
        assert!(out.contains("Result: final quantity (N(t)) = 377.8932"));
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_half_life_uses_value_precision() {
        let out = run_menu("1\n5\n0.05\n7\n3\n");
        assert!(out.contains("Result: half-life (T_half) = 13.8629"));
    }

    #[test]
    fn test_rate_uses_rate_precision() {
        let out = run_menu("1\n6\n13.862943611198906\n7\n3\n");
        assert!(out.contains("Result: decay constant (k) = 0.050000"));
    }

    #[test]
    fn test_reprompts_until_number() {
        let out = run_menu("2\n1\nwarm\n25\n100\nabc\n0.1\n10\n6\n3\n");
        assert_eq!(out.matches("Please enter a number.").count(), 2);
        assert!(out.contains("'warm' is not a valid number for Ta"));
        assert!(out.contains("Result: final temperature (T(t)) = 52.5910"));
    }

    #[test]
    fn test_domain_error_is_reported_and_menu_continues() {
        let out = run_menu("1\n3\n100\n0\n0.1\n5\n0.05\n7\n3\n");
        assert!(out.contains("Error: N(t)/N0 must be positive for the logarithm to be defined"));
        assert!(out.contains("half-life (T_half) = 13.8629"));
    }

    #[test]
    fn test_ambient_near_zero_reported() {
        let out = run_menu("2\n5\n99.9\n100\n0.000001\n0.0001\n6\n3\n");
        assert!(out.contains("Error: 1 - e^(-kt) must not be within 1e-9 of zero"));
    }

    #[test]
    fn test_invalid_choices() {
        let out = run_menu("9\n1\n0\n7\n3\n");
        assert!(out.contains("Invalid option '9'. Please choose 1, 2 or 3."));
        assert!(out.contains("Invalid option. Please choose a number from 1 to 7."));
    }

    #[test]
    fn test_separator_follows_every_model_menu_pass() {
        let separator = format!("\n{}\n", "-".repeat(SEPARATOR_WIDTH));

        let out = run_menu("1\nx\n7\n3\n");
        assert_eq!(out.matches(&separator).count(), 1);

        let out = run_menu("1\nx\n5\n0.05\n7\n3\n");
        assert_eq!(out.matches(&separator).count(), 2);
    }

    #[test]
    fn test_end_of_input_mid_prompt_exits() {
        let out = run_menu("2\n4\n25\n");
        assert!(out.contains("Enter the final temperature (T(t)): "));
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn test_end_of_input_at_top_menu() {
        let out = run_menu("");
        assert!(out.ends_with("Select an option (1-3): "));
    }
}
