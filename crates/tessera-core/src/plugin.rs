use crate::app::AppBuilder;

/// A bundle of resources and systems added to an app in one go.
pub trait Plugin {
    fn build(&mut self, app: &mut AppBuilder);

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
