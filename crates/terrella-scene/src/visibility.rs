/// Per-mesh visibility as two independent boolean channels.
///
/// `render` controls whether the renderer draws the mesh; `collision`
/// controls whether physics raycasts can hit it. The channels never couple:
/// culling a mesh off-screen must not open a hole in the ground under the
/// character's feet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    /// Drawn by the renderer this frame.
    pub render: bool,
    /// Reachable by physics queries.
    pub collision: bool,
    /// The render value authored at scene load, for restore when the
    /// culling pass is disabled.
    authored_render: bool,
}

impl Visibility {
    /// Visibility as authored at scene construction.
    pub fn new(render: bool, collision: bool) -> Self {
        Self {
            render,
            collision,
            authored_render: render,
        }
    }

    /// Write the render channel only. Collision is untouched.
    pub fn set_render(&mut self, visible: bool) {
        self.render = visible;
    }

    /// Restore the render channel to its authored value.
    pub fn restore_authored(&mut self) {
        self.render = self.authored_render;
    }

    /// The render value authored at scene load.
    pub fn authored_render(&self) -> bool {
        self.authored_render
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::new(true, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_are_independent() {
        let mut v = Visibility::new(true, true);
        v.set_render(false);
        assert!(!v.render);
        assert!(v.collision, "collision channel must survive render toggles");
    }

    #[test]
    fn test_restore_authored() {
        let mut v = Visibility::new(true, true);
        v.set_render(false);
        v.restore_authored();
        assert!(v.render);

        let mut hidden = Visibility::new(false, true);
        hidden.set_render(true);
        hidden.restore_authored();
        assert!(!hidden.render, "authored-hidden mesh must stay hidden");
    }
}
