/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn plus_secs(self, secs: f64) -> Self {
        Time(self.0 + secs)
    }
}
