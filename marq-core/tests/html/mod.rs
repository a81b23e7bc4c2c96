mod sanitize;
