// This file is required to make `cargo test` discover tests in subdirectories.

#[cfg(test)]
mod common;

#[cfg(test)]
mod documents;


#[cfg(test)]
mod inline_props;

#[cfg(test)]
mod publish;
