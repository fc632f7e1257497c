//! Option flags for registration, resolution and unregistration, plus the
//! device form factor mask used for view selection.

use bitflags::bitflags;

bitflags! {
    /// Flags controlling how a registration reacts to an existing key.
    ///
    /// With no flags set, the last registration for a key wins.
    ///
    /// ```rust
    /// use ligature_core::RegisterOptions;
    ///
    /// let once = RegisterOptions::SKIP_IF_EXISTS | RegisterOptions::PROTECT;
    /// assert!(once.contains(RegisterOptions::PROTECT));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegisterOptions: u8 {
        /// Fail with `AlreadyRegistered` if the key exists.
        const THROW_IF_EXISTS = 1 << 0;
        /// Leave the existing registration in place and do nothing.
        const SKIP_IF_EXISTS = 1 << 1;
        /// Mark the new registration as non-overwritable.
        const PROTECT = 1 << 2;
    }
}

bitflags! {
    /// Flags controlling a single resolution.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResolveOptions: u8 {
        /// Fail with `NotRegistered` instead of returning nothing.
        const THROW_IF_NOT_REGISTERED = 1 << 0;
        /// Construct a fresh instance even for a cached singleton.
        const CREATE_NEW = 1 << 1;
        /// Fall back to the registered name closest to the requested one.
        const USE_FUZZY_NAME_RESOLUTION = 1 << 2;
        /// Fall back to the constructor or factory closest in arity.
        const USE_FUZZY_PARAMETER_RESOLUTION = 1 << 3;
    }
}

bitflags! {
    /// Flags controlling which registrations an unregistration removes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UnregisterOptions: u8 {
        /// Fail with `NotRegistered` if nothing was removed.
        const THROW_IF_NOT_REGISTERED = 1 << 0;
        /// Remove every registration of the type, whatever its name.
        const REMOVE_ALL_OF_TYPE = 1 << 1;
        /// Remove every registration with the name, whatever its type.
        const REMOVE_ALL_WITH_NAME = 1 << 2;
    }
}

bitflags! {
    /// Device classes a view is suitable for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormFactor: u8 {
        /// Small handheld screens.
        const PHONE = 1 << 0;
        /// Large handheld screens.
        const TABLET = 1 << 1;
        /// Desktop and laptop screens.
        const DESKTOP = 1 << 2;
        /// Suitable everywhere.
        const ALL = Self::PHONE.bits() | Self::TABLET.bits() | Self::DESKTOP.bits();
    }
}

impl Default for FormFactor {
    fn default() -> Self {
        FormFactor::ALL
    }
}

impl FormFactor {
    /// Check if a view registered for this mask suits `current`.
    pub fn supports(&self, current: FormFactor) -> bool {
        self.intersects(current)
    }
}
