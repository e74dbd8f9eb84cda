use anyhow::Context;
use nest_crypto::Credential;

/// Environment variable consulted before prompting.
pub const PASSWORD_ENV: &str = "NEST_PASSWORD";

type Prompt = Box<dyn Fn() -> std::io::Result<String>>;

/// Supplies the password for sealed sources, asking at most once.
pub struct Credentials {
    cached: Option<Credential>,
    prompt: Prompt,
}

impl Credentials {
    /// Use `NEST_PASSWORD` if set, otherwise prompt on the terminal when a
    /// password is first needed.
    pub fn from_env() -> Self {
        match std::env::var(PASSWORD_ENV) {
            Ok(password) => Self::fixed(Credential::new(password)),
            Err(_) => Self {
                cached: None,
                prompt: Box::new(|| rpassword::prompt_password("Password: ")),
            },
        }
    }

    /// A fixed password, never prompting.
    pub fn fixed(credential: Credential) -> Self {
        Self {
            cached: Some(credential),
            prompt: Box::new(no_prompt),
        }
    }

    /// No password available; any request fails.
    #[cfg(test)]
    pub fn unavailable() -> Self {
        Self {
            cached: None,
            prompt: Box::new(no_prompt),
        }
    }

    /// The password, prompting for it on first use.
    pub fn get(&mut self) -> anyhow::Result<Credential> {
        if let Some(credential) = &self.cached {
            return Ok(credential.clone());
        }
        let password = (self.prompt)().context("reading password")?;
        let credential = Credential::new(password);
        self.cached = Some(credential.clone());
        Ok(credential)
    }
}

fn no_prompt() -> std::io::Result<String> {
    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("no password given; set {PASSWORD_ENV}"),
    ))
}
