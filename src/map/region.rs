/// A named boundary unit (an electoral ward) and the council area containing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub council: Option<String>,
}

impl Region {
    pub fn new(name: impl Into<String>, council: Option<String>) -> Self {
        Self { name: name.into(), council }
    }
}
