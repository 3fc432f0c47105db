/// Infer a coarse file category from a path. Case-insensitive substring and
/// suffix tests, first match wins; callers rely on this exact order.
pub fn detect_type(path: &str) -> &'static str {
    let lower = path.to_lowercase();

    if lower.contains("nginx") {
        return "nginx";
    }
    if lower.contains("apache") || lower.contains("httpd") {
        return "apache";
    }
    if lower.contains("cron") || lower.ends_with("crontab") {
        return "cron";
    }
    if lower.contains("systemd") || lower.ends_with(".service") {
        return "systemd";
    }
    if lower.contains("docker") || lower.ends_with("dockerfile") {
        return "docker";
    }
    if lower.ends_with(".yml") || lower.ends_with(".yaml") {
        return "yaml";
    }
    if lower.ends_with(".json") {
        return "json";
    }
    if lower.ends_with(".env") {
        return "env";
    }
    if lower.ends_with(".sh") {
        return "shell";
    }
    if lower.ends_with(".py") {
        return "python";
    }
    if lower.ends_with(".js") || lower.ends_with(".ts") {
        return "js";
    }
    if lower.ends_with(".sql") {
        return "sql";
    }
    if lower.contains("ssh_config") || lower.contains("sshd_config") {
        return "ssh";
    }

    "other"
}
