#![cfg(feature = "cli")]

use std::rc::Rc;

use crate::tools::logger::Logger;

#[derive(Clone)]
pub struct CliContext {
    logger: Rc<Logger>,
}

impl CliContext {
    pub fn new() -> Self {
        Self {
            logger: Rc::new(Logger::new()),
        }
    }

    pub fn logger(&self) -> Rc<Logger> {
        Rc::clone(&self.logger)
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
