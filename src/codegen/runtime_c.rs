//! C text of the runtime primitives
//!
//! Each helper is a separate constant so the emitter only writes the ones a
//! program uses. The always-present core mirrors [`crate::runtime`]: the
//! allocation check runs before anything is written, and the previous cache
//! is released only once its replacement exists.

pub(crate) const GLOBALS: &str = "\
static char* trica_last_output = NULL;
static size_t trica_last_output_len = 0;
";

pub(crate) const ALLOC: &str = "\
static void* trica_alloc(size_t size) {
    void* block = malloc(size);
    if (block == NULL) {
        fputs(\"trica: out of memory\\n\", stderr);
        exit(1);
    }
    return block;
}
";

pub(crate) const DUP: &str = "\
static char* trica_dup(const char* str) {
    size_t len = strlen(str);
    char* copy = (char*)trica_alloc(len + 1);
    memcpy(copy, str, len + 1);
    return copy;
}
";

pub(crate) const PRINT: &str = "\
static void trica_print(const char* str) {
    size_t len = strlen(str);
    char* copy = (char*)trica_alloc(len + 1);
    memcpy(copy, str, len + 1);
    fputs(str, stdout);
    free(trica_last_output);
    trica_last_output = copy;
    trica_last_output_len = len;
}
";

pub(crate) const CONCAT: &str = "\
static char* trica_concat(const char* str1, const char* str2) {
    size_t len1 = strlen(str1), len2 = strlen(str2);
    char* result = (char*)trica_alloc(len1 + len2 + 1);
    memcpy(result, str1, len1);
    memcpy(result + len1, str2, len2 + 1);
    return result;
}
";

pub(crate) const GET_LAST_OUTPUT: &str = "\
static const char* trica_get_last_output(void) {
    return trica_last_output ? trica_last_output : \"\";
}
";

pub(crate) const FORMAT_NUMBER: &str = "\
static char* trica_format_number(double value) {
    char buffer[400];
    if (value != value) {
        return trica_dup(\"NaN\");
    }
    if (value >= 4503599627370496.0 || value <= -4503599627370496.0
        || value == (double)(long long)value) {
        snprintf(buffer, sizeof buffer, \"%.0f\", value);
    } else {
        int precision;
        for (precision = 1; precision <= 350; precision++) {
            snprintf(buffer, sizeof buffer, \"%.*f\", precision, value);
            if (strtod(buffer, NULL) == value) {
                break;
            }
        }
    }
    return trica_dup(buffer);
}
";

pub(crate) const DIV: &str = "\
static double trica_div(double a, double b) {
    if (b == 0.0) {
        fputs(\"trica: division by zero\\n\", stderr);
        exit(1);
    }
    return a / b;
}
";

pub(crate) const INPUT: &str = "\
static char* trica_input(const char* prompt) {
    size_t capacity = 64, len = 0;
    char* line = (char*)trica_alloc(capacity);
    int ch;
    fputs(prompt, stdout);
    fflush(stdout);
    while ((ch = getchar()) != EOF && ch != '\\n') {
        if (len + 1 == capacity) {
            char* grown = (char*)realloc(line, capacity * 2);
            if (grown == NULL) {
                free(line);
                fputs(\"trica: out of memory\\n\", stderr);
                exit(1);
            }
            line = grown;
            capacity *= 2;
        }
        line[len++] = (char)ch;
    }
    if (len > 0 && line[len - 1] == '\\r') {
        len--;
    }
    line[len] = '\\0';
    return line;
}
";
