// Stat name classification. Walks the dot-separated name one segment at a time:
//   plugin.remap_stats.<subsubdomain>.<subdomain>.<domain...>.<name>  -> delivery service stat
//   proxy.* | server.*                                                -> not processed
// Anything else is an error for that stat line.

use crate::error::StatError;
use crate::models::DeliveryServiceName;
use crate::topology::TopologyLookup;

/// Outcome of classifying one stat name that is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Remap stat `name` reported for `delivery_service`.
    RemapStat {
        delivery_service: DeliveryServiceName,
        name: &'a str,
    },
    /// Recognized namespace that carries nothing to aggregate.
    NotProcessed,
}

pub fn classify<'a, T>(stat: &'a str, topology: &T) -> Result<Classification<'a>, StatError>
where
    T: TopologyLookup + ?Sized,
{
    let parts: Vec<&str> = stat.split('.').collect();
    match parts.as_slice() {
        ["plugin", rest @ ..] => classify_plugin(stat, rest, topology),
        ["proxy" | "server", ..] => Ok(Classification::NotProcessed),
        [first, ..] => Err(StatError::UnknownInitialPart {
            stat: stat.to_string(),
            part: first.to_string(),
        }),
        [] => Err(StatError::UnknownInitialPart {
            stat: stat.to_string(),
            part: String::new(),
        }),
    }
}

fn classify_plugin<'a, T>(
    stat: &'a str,
    parts: &[&'a str],
    topology: &T,
) -> Result<Classification<'a>, StatError>
where
    T: TopologyLookup + ?Sized,
{
    match parts {
        ["remap_stats", rest @ ..] => classify_remap_stats(stat, rest, topology),
        [part, ..] => Err(StatError::UnknownPluginPart {
            stat: stat.to_string(),
            part: part.to_string(),
        }),
        [] => Err(StatError::MissingPluginPart {
            stat: stat.to_string(),
        }),
    }
}

fn classify_remap_stats<'a, T>(
    stat: &'a str,
    parts: &[&'a str],
    topology: &T,
) -> Result<Classification<'a>, StatError>
where
    T: TopologyLookup + ?Sized,
{
    let [subsubdomain, subdomain, domain @ .., name] = parts else {
        return Err(StatError::MissingRemapParts {
            stat: stat.to_string(),
        });
    };
    let domain = domain.join(".");

    match topology.delivery_service(&domain, subdomain, subsubdomain) {
        Some("") => Err(StatError::EmptyDeliveryService {
            fqdn: format!("{subsubdomain}.{subdomain}.{domain}"),
            stat: stat.to_string(),
        }),
        Some(ds) => Ok(Classification::RemapStat {
            delivery_service: ds.to_string(),
            name: *name,
        }),
        None => Err(StatError::NoDeliveryService {
            fqdn: format!("{subsubdomain}.{subdomain}.{domain}"),
            stat: stat.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    fn topology() -> Topology {
        let mut t = Topology::default();
        t.delivery_service_fqdns
            .insert("edge1.ds-1.example.com".into(), "ds-1".into());
        t.delivery_service_fqdns
            .insert("edge.blank.example.com".into(), String::new());
        t
    }

    #[test]
    fn classify_remap_stat_resolves_delivery_service() {
        let got = classify("plugin.remap_stats.edge1.ds-1.example.com.status_2xx", &topology());
        assert_eq!(
            got,
            Ok(Classification::RemapStat {
                delivery_service: "ds-1".into(),
                name: "status_2xx",
            })
        );
    }

    #[test]
    fn classify_proxy_and_server_are_not_processed() {
        assert_eq!(
            classify("server.some.stat", &topology()),
            Ok(Classification::NotProcessed)
        );
        assert_eq!(
            classify("proxy.process.http.total_incoming_connections", &topology()),
            Ok(Classification::NotProcessed)
        );
    }

    #[test]
    fn classify_unknown_initial_part_is_error() {
        assert_eq!(
            classify("bogus.x", &topology()),
            Err(StatError::UnknownInitialPart {
                stat: "bogus.x".into(),
                part: "bogus".into(),
            })
        );
    }

    #[test]
    fn classify_unknown_plugin_part_is_error() {
        assert!(matches!(
            classify("plugin.other_stats.a.b.c", &topology()),
            Err(StatError::UnknownPluginPart { part, .. }) if part == "other_stats"
        ));
        assert!(matches!(
            classify("plugin", &topology()),
            Err(StatError::MissingPluginPart { .. })
        ));
    }

    #[test]
    fn classify_short_remap_path_is_error() {
        assert!(matches!(
            classify("plugin.remap_stats.edge1.ds-1", &topology()),
            Err(StatError::MissingRemapParts { .. })
        ));
    }

    #[test]
    fn classify_unresolved_fqdn_names_fqdn_and_stat() {
        let stat = "plugin.remap_stats.edge9.nope.example.com.out_bytes";
        assert_eq!(
            classify(stat, &topology()),
            Err(StatError::NoDeliveryService {
                fqdn: "edge9.nope.example.com".into(),
                stat: stat.into(),
            })
        );
    }

    #[test]
    fn classify_empty_delivery_service_is_error() {
        assert!(matches!(
            classify("plugin.remap_stats.edge.blank.example.com.out_bytes", &topology()),
            Err(StatError::EmptyDeliveryService { .. })
        ));
    }

    #[test]
    fn classify_wildcard_match_for_http_routed_service() {
        let mut t = topology();
        t.delivery_service_wildcards
            .insert("ds-2.example.com".into(), "ds-2".into());
        assert_eq!(
            classify("plugin.remap_stats.any-cache.ds-2.example.com.in_bytes", &t),
            Ok(Classification::RemapStat {
                delivery_service: "ds-2".into(),
                name: "in_bytes",
            })
        );
    }
}
