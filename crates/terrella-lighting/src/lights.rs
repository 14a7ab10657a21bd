/// Handle to a light registered with [`ShadowLights`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightId(u32);

#[derive(Clone, Debug)]
struct ShadowLight {
    casts_shadow: bool,
    authored: bool,
}

/// Registry of the scene's shadow-casting lights.
///
/// On frames the throttle skips, `suspend` turns every light's
/// shadow-casting flag off so the renderer reuses the existing shadow map
/// instead of re-rendering it; `resume` restores each light to its
/// authored flag before an update frame.
#[derive(Debug, Default)]
pub struct ShadowLights {
    lights: Vec<ShadowLight>,
    suspended: bool,
}

impl ShadowLights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a light; `casts_shadow` is its authored flag.
    pub fn register(&mut self, casts_shadow: bool) -> LightId {
        let id = LightId(self.lights.len() as u32);
        self.lights.push(ShadowLight {
            casts_shadow: casts_shadow && !self.suspended,
            authored: casts_shadow,
        });
        id
    }

    /// Current shadow-casting flag for the renderer to read.
    pub fn casts_shadow(&self, id: LightId) -> bool {
        self.lights
            .get(id.0 as usize)
            .is_some_and(|l| l.casts_shadow)
    }

    /// Turn shadow casting off on every light for a skipped frame.
    pub fn suspend(&mut self) {
        for light in &mut self.lights {
            light.casts_shadow = false;
        }
        self.suspended = true;
    }

    /// Restore every light to its authored shadow-casting flag.
    pub fn resume(&mut self) {
        for light in &mut self.lights {
            light.casts_shadow = light.authored;
        }
        self.suspended = false;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}
