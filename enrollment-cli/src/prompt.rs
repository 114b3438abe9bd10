use anyhow::{Result, bail};
use std::io::{BufRead, Write};

/// Line-oriented terminal dialogue
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        Ok(())
    }

    /// Reads one trimmed line; `None` once input is exhausted
    pub fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    pub fn ask(&mut self, label: &str) -> Result<String> {
        match self.read_line(&format!("{label}: "))? {
            Some(line) => Ok(line),
            None => bail!("input closed"),
        }
    }

    /// Shows a numbered menu and returns the picked value
    pub fn choose<T: Copy>(&mut self, label: &str, options: &[(T, &str)]) -> Result<T> {
        self.say(label)?;
        for (index, (_, name)) in options.iter().enumerate() {
            self.say(format!("  {}) {}", index + 1, name))?;
        }
        loop {
            let answer = self.ask("Option")?;
            let picked = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            match picked {
                Some((value, _)) => return Ok(*value),
                None => self.say(format!("Pick a number from 1 to {}.", options.len()))?,
            }
        }
    }

    pub fn confirm(&mut self, label: &str) -> Result<bool> {
        let answer = self.ask(&format!("{label} [y/N]"))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "sim"))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
pub(crate) fn scripted(lines: &[&str]) -> Prompt<std::io::Cursor<Vec<u8>>, Vec<u8>> {
    let mut script = lines.join("\n");
    script.push('\n');
    Prompt::new(std::io::Cursor::new(script.into_bytes()), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choose_retries_until_valid() {
        let mut prompt = scripted(&["9", "x", "2"]);
        let picked = prompt.choose("Plan", &[('a', "First"), ('b', "Second")]).unwrap();
        assert_eq!(picked, 'b');
        let output = String::from_utf8(prompt.into_output()).unwrap();
        assert_eq!(output.matches("Pick a number from 1 to 2.").count(), 2);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut prompt = scripted(&["sim"]);
        assert!(prompt.confirm("Delete?").unwrap());
        assert!(prompt.ask("Name").is_err());
    }
}
