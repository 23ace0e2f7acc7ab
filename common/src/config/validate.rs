/// Checks a deserialized value before it is handed to the engine.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), String> {
        match self {
            Some(value) => value.validate(),
            None => Ok(()),
        }
    }
}
