use std::io::{self, IsTerminal, Read, Write};

use anyhow::Context;
use colored::Colorize;
use nest_codec::{parse_cli_value, Codec};
use nest_crypto::{Credential, Envelope};
use nest_map::{ops, KeyPath, NestedMap, Value};
use nest_source::{Location, Source, SourceAdapter, SourceError};
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;
use crate::password::Credentials;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::resolve(&cli)?;
    let mut session = Session::new(config, Credentials::from_env())
        .with_input(cli.input)
        .with_output(cli.output)
        .with_encrypt(cli.encrypt);

    let stdin = io::stdin();
    let mut piped = (!stdin.is_terminal()).then(|| stdin.lock());
    let mut stdout = io::stdout().lock();
    session.execute(
        cli.command,
        piped.as_mut().map(|lock| lock as &mut dyn Read),
        &mut stdout,
    )?;
    stdout.flush().context("flushing stdout")
}

/// One load-modify-store cycle over a tree.
pub struct Session {
    config: CliConfig,
    adapter: SourceAdapter,
    credentials: Credentials,
    input: Option<Location>,
    output: Option<Location>,
    encrypt: bool,
    /// Password that opened the input, reused to seal the output.
    opened_with: Option<Credential>,
}

impl Session {
    pub fn new(config: CliConfig, credentials: Credentials) -> Self {
        let adapter = SourceAdapter::new(config.source.clone());
        Self {
            config,
            adapter,
            credentials,
            input: None,
            output: None,
            encrypt: false,
            opened_with: None,
        }
    }

    pub fn with_input(mut self, input: Option<Location>) -> Self {
        self.input = input;
        self
    }

    pub fn with_output(mut self, output: Option<Location>) -> Self {
        self.output = output;
        self
    }

    pub fn with_encrypt(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    /// Run `command`. `stdin` is read only when no input source is set.
    pub fn execute(
        &mut self,
        command: Command,
        stdin: Option<&mut dyn Read>,
        stdout: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let mut tree = self.load(stdin)?;
        match command {
            Command::Create(args) => {
                let value = parse_cli_value(&args.value);
                ops::create(&mut tree, &args.path, value)
                    .with_context(|| format!("creating {}", args.path))?;
                status("Created", &args.path);
                self.store(&tree, stdout)
            }
            Command::Update(args) => {
                let value = parse_cli_value(&args.value);
                ops::update(&mut tree, &args.path, value)
                    .with_context(|| format!("updating {}", args.path))?;
                status("Updated", &args.path);
                self.store(&tree, stdout)
            }
            Command::Delete(args) => {
                let path = args.path.unwrap_or_default();
                let removed = ops::delete(&mut tree, &path)
                    .with_context(|| format!("deleting {path}"))?;
                debug!(path = %path, leaves = removed.leaf_count(), "removed");
                status("Deleted", &path);
                self.store(&tree, stdout)
            }
            Command::Read(args) => {
                let path = args.path.unwrap_or_default();
                let node = ops::get(&tree, &path).with_context(|| format!("reading {path}"))?;
                self.write_node(node, args.raw, stdout)
            }
            Command::List(args) => {
                let path = args.path.unwrap_or_default();
                let node = ops::get(&tree, &path).with_context(|| format!("listing {path}"))?;
                let children = node
                    .children()
                    .with_context(|| format!("{path} is a leaf"))?;
                for (key, child) in children {
                    let suffix = if child.is_container() { "." } else { "" };
                    writeln!(stdout, "{key}{suffix}").context("writing to stdout")?;
                }
                Ok(())
            }
            Command::Print => self.write_node(&tree, false, stdout),
        }
    }

    fn load(&mut self, stdin: Option<&mut dyn Read>) -> anyhow::Result<NestedMap> {
        let mut tree = match (self.input.clone(), stdin) {
            (Some(location), _) => self.load_source(location)?,
            (None, Some(reader)) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).context("reading stdin")?;
                self.decode_piped(bytes)?
            }
            (None, None) => NestedMap::new(),
        };
        let pruned = tree.prune();
        if pruned > 0 {
            debug!(pruned, "dropped empty containers from input");
        }
        Ok(tree)
    }

    /// Load without a password first; ask for one only if the source turns
    /// out to be sealed.
    fn load_source(&mut self, location: Location) -> anyhow::Result<NestedMap> {
        let source = Source::new(location);
        match self.adapter.load(&source) {
            Err(SourceError::CredentialRequired(_)) => {
                let credential = self.credentials.get()?;
                let sealed = source.with_credential(credential.clone());
                let tree = self
                    .adapter
                    .load(&sealed)
                    .with_context(|| format!("opening {}", sealed.location))?;
                self.opened_with = Some(credential);
                Ok(tree)
            }
            result => result.with_context(|| format!("loading {}", source.location)),
        }
    }

    fn decode_piped(&mut self, bytes: Vec<u8>) -> anyhow::Result<NestedMap> {
        let plain = if Envelope::is_sealed(&bytes) {
            let credential = self.credentials.get()?;
            let plain = Envelope::open(&credential, &bytes).context("opening sealed stdin")?;
            self.opened_with = Some(credential);
            plain
        } else {
            bytes
        };
        Codec::decode(&plain).context("decoding stdin")
    }

    fn output_credential(&mut self) -> anyhow::Result<Option<Credential>> {
        match (&self.opened_with, self.encrypt) {
            (Some(credential), _) => Ok(Some(credential.clone())),
            (None, true) => self.credentials.get().map(Some),
            (None, false) => Ok(None),
        }
    }

    fn store(&mut self, tree: &NestedMap, stdout: &mut dyn Write) -> anyhow::Result<()> {
        let credential = self.output_credential()?;
        match self.output.clone().or_else(|| self.input.clone()) {
            Some(location) => {
                let source = Source {
                    location,
                    credential,
                };
                self.adapter
                    .save(tree, &source)
                    .with_context(|| format!("saving {}", source.location))
            }
            None => {
                let encoded = Codec::encode(tree, self.config.format)?;
                let bytes = match &credential {
                    Some(credential) => Envelope::seal(credential, &encoded)?,
                    None => encoded,
                };
                stdout.write_all(&bytes).context("writing to stdout")
            }
        }
    }

    fn write_node(
        &self,
        node: &NestedMap,
        raw: bool,
        stdout: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let bytes = match node {
            NestedMap::Leaf(Value::Text(text)) if raw => text.as_bytes().to_vec(),
            NestedMap::Leaf(Value::Binary(bytes)) if raw => bytes.clone(),
            _ => Codec::encode(node, self.config.format)?,
        };
        stdout.write_all(&bytes).context("writing to stdout")
    }
}

fn status(action: &str, path: &KeyPath) {
    eprintln!("{} {} {}", "✓".green().bold(), action, path.to_string().yellow());
}
