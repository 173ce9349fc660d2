use std::{fmt, str::FromStr};

/// A module that provides APIs at an extension SDK level.
///
/// The catalog is closed: every module has a stable symbolic name and a
/// stable integer code, and the mapping between the two is bijective. The
/// code is what appears on the wire; the name is what appears in the text
/// database and on the command line.
///
/// Modules order by their code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum SdkModule {
    /// Placeholder for the zero value of the wire enumeration.
    Unknown = 0,
    /// IPsec.
    Ipsec = 1,
    /// Media.
    Media = 2,
    /// Media provider.
    MediaProvider = 3,
    /// Permissions.
    Permissions = 4,
    /// SDK extensions.
    SdkExtensions = 5,
    /// Statsd.
    Statsd = 6,
    /// Tethering.
    Tethering = 7,
    /// ART.
    Art = 8,
    /// App search.
    AppSearch = 9,
    /// On-device personalization.
    OnDevicePersonalization = 10,
    /// Ad services.
    AdServices = 11,
    /// Config infrastructure.
    ConfigInfrastructure = 12,
    /// Health fitness.
    HealthFitness = 13,
    /// Ext services.
    ExtServices = 14,
    /// Neural networks.
    NeuralNetworks = 15,
}

impl SdkModule {
    /// Every module in the catalog, in code order.
    pub const ALL: [Self; 16] = [
        Self::Unknown,
        Self::Ipsec,
        Self::Media,
        Self::MediaProvider,
        Self::Permissions,
        Self::SdkExtensions,
        Self::Statsd,
        Self::Tethering,
        Self::Art,
        Self::AppSearch,
        Self::OnDevicePersonalization,
        Self::AdServices,
        Self::ConfigInfrastructure,
        Self::HealthFitness,
        Self::ExtServices,
        Self::NeuralNetworks,
    ];

    /// Returns the symbolic name of the module, e.g. `MEDIA_PROVIDER`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Ipsec => "IPSEC",
            Self::Media => "MEDIA",
            Self::MediaProvider => "MEDIA_PROVIDER",
            Self::Permissions => "PERMISSIONS",
            Self::SdkExtensions => "SDK_EXTENSIONS",
            Self::Statsd => "STATSD",
            Self::Tethering => "TETHERING",
            Self::Art => "ART",
            Self::AppSearch => "APPSEARCH",
            Self::OnDevicePersonalization => "ON_DEVICE_PERSONALIZATION",
            Self::AdServices => "AD_SERVICES",
            Self::ConfigInfrastructure => "CONFIG_INFRASTRUCTURE",
            Self::HealthFitness => "HEALTH_FITNESS",
            Self::ExtServices => "EXT_SERVICES",
            Self::NeuralNetworks => "NEURAL_NETWORKS",
        }
    }

    /// Returns the integer code of the module.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Looks up a module by its integer code.
    ///
    /// Returns `None` if no module in the catalog has this code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|module| module.code() == code)
    }

    /// Looks up a module by its symbolic name.
    ///
    /// Names are matched exactly; the catalog is all upper case.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownModuleError`] if no module has this name.
    pub fn from_name(name: &str) -> Result<Self, UnknownModuleError> {
        Self::ALL
            .iter()
            .copied()
            .find(|module| module.name() == name)
            .ok_or_else(|| UnknownModuleError(name.to_string()))
    }
}

impl fmt::Display for SdkModule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SdkModule {
    type Err = UnknownModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Error returned when a name is not in the module catalog.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown module '{0}'")]
pub struct UnknownModuleError(String);

impl UnknownModuleError {
    /// Returns the name that failed to resolve.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("UNKNOWN", 0)]
    #[test_case("IPSEC", 1)]
    #[test_case("MEDIA_PROVIDER", 3)]
    #[test_case("SDK_EXTENSIONS", 5)]
    #[test_case("AD_SERVICES", 11)]
    #[test_case("NEURAL_NETWORKS", 15)]
    fn name_and_code_agree(name: &str, code: i32) {
        let by_name = SdkModule::from_name(name).unwrap();
        let by_code = SdkModule::from_code(code).unwrap();
        assert_eq!(by_name, by_code);
        assert_eq!(by_name.name(), name);
        assert_eq!(by_code.code(), code);
    }

    #[test]
    fn catalog_is_bijective() {
        for (index, module) in SdkModule::ALL.iter().enumerate() {
            assert_eq!(module.code(), i32::try_from(index).unwrap());
            assert_eq!(SdkModule::from_code(module.code()), Some(*module));
            assert_eq!(module.name().parse::<SdkModule>(), Ok(*module));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "NOT_A_MODULE".parse::<SdkModule>().unwrap_err();
        assert_eq!(err.name(), "NOT_A_MODULE");
        assert_eq!(err.to_string(), "Unknown module 'NOT_A_MODULE'");
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!(SdkModule::from_name("ipsec").is_err());
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(SdkModule::from_code(-1), None);
        assert_eq!(SdkModule::from_code(16), None);
    }

    #[test]
    fn display_uses_symbolic_name() {
        assert_eq!(SdkModule::MediaProvider.to_string(), "MEDIA_PROVIDER");
    }

    #[test]
    fn modules_order_by_code() {
        assert!(SdkModule::Ipsec < SdkModule::Tethering);
        assert!(SdkModule::Art < SdkModule::AdServices);
    }
}
