//! Per-compilation counters
//!
//! Labels are handed out while the tree is built, temporaries while code is
//! generated.  Both counters only ever grow, so every label and temporary
//! issued by one [`Session`] is distinct from every other.  Generating code
//! twice from the same tree therefore produces fresh temporaries the second
//! time.

use crate::parser::ast::{Label, Temp};

#[derive(Debug, Default)]
pub struct Session {
    labels: u32,
    temps: u32,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn new_label(&mut self) -> Label {
        self.labels += 1;
        Label(self.labels)
    }

    pub fn new_temp(&mut self) -> Temp {
        self.temps += 1;
        Temp(self.temps)
    }

    pub fn labels_issued(&self) -> u32 {
        self.labels
    }

    pub fn temps_issued(&self) -> u32 {
        self.temps
    }
}
